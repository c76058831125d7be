//! The Wayfinder agent loop: observe, think, act
//!
//! The agent follows a **Thought → Action → Observation** cycle:
//!
//! 1. **Seed** the conversation with the system prompt and the user's query
//! 2. **Send to LLM** the rendered conversation
//! 3. **Parse** the reply into a thought, an action, and parameters
//! 4. **If a tool action**: dispatch it, append the observation, loop back to step 2
//! 5. **If `final_answer`**: return its parameters
//!
//! The loop continues until the model answers or the max iteration limit
//! is reached.

pub mod context;
pub mod dispatcher;
pub mod parser;
pub mod patterns;
pub mod prompt;

pub use context::{TraceEntry, TraceKind, WorkingMemory};
pub use dispatcher::Dispatcher;
pub use parser::ParsedDecision;
pub use patterns::{AgentResult, Outcome, ReactAgent};
