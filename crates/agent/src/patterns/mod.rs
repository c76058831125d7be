//! Agent patterns: structured reasoning strategies.
//!
//! **ReAct**: Thought → Action → Observation loop with visible traces.

pub mod react;

pub use react::{AgentResult, Outcome, ReactAgent};

#[cfg(test)]
pub(crate) mod test_helpers;
