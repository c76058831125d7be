//! Per-run context kept by the agent loop.

pub mod working_memory;

pub use working_memory::{TraceEntry, TraceKind, WorkingMemory, render_trace};
