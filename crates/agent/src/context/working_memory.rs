//! Working memory: the per-run scratchpad of the agent loop.
//!
//! Records every step of a run as trace entries (model reply, thought,
//! action, observation, retry) and counts iterations against the budget.
//! Working memory is:
//!
//! - **Run-scoped**: created fresh by each call to `ReactAgent::run`
//! - **Serializable**: can be exported to JSON for debugging
//! - **Renderable**: produces the human-readable step-by-step trace

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The agent's scratchpad within a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemory {
    /// ReAct reasoning trace entries.
    pub trace: Vec<TraceEntry>,

    /// Current iteration counter.
    pub iterations: usize,

    /// Maximum iterations allowed.
    pub max_iterations: usize,
}

/// A single entry in the reasoning trace.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TraceEntry {
    /// The iteration this entry belongs to (1-based).
    pub iteration: usize,
    pub kind: TraceKind,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// The kind of reasoning trace entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TraceKind {
    /// Raw model reply
    Response,
    Thought,
    Action,
    Observation,
    /// The reply had no action and the model was re-prompted
    Retry,
}

impl TraceKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Response => "Response",
            Self::Thought => "Thought",
            Self::Action => "Action",
            Self::Observation => "Observation",
            Self::Retry => "Retry",
        }
    }
}

impl WorkingMemory {
    /// Create a new empty working memory.
    pub fn new(max_iterations: usize) -> Self {
        Self {
            trace: Vec::new(),
            iterations: 0,
            max_iterations,
        }
    }

    // ── Trace recording ──

    pub fn add_response(&mut self, response: &str) {
        self.push_trace(TraceKind::Response, response);
    }

    pub fn add_thought(&mut self, thought: &str) {
        self.push_trace(TraceKind::Thought, thought);
    }

    pub fn add_action(&mut self, action: &str) {
        self.push_trace(TraceKind::Action, action);
    }

    pub fn add_observation(&mut self, observation: &str) {
        self.push_trace(TraceKind::Observation, observation);
    }

    pub fn add_retry(&mut self, note: &str) {
        self.push_trace(TraceKind::Retry, note);
    }

    fn push_trace(&mut self, kind: TraceKind, content: &str) {
        self.trace.push(TraceEntry {
            iteration: self.iterations,
            kind,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
    }

    // ── Iteration tracking ──

    /// Increment the iteration counter. Returns `false` if max exceeded.
    pub fn tick(&mut self) -> bool {
        self.iterations += 1;
        self.iterations <= self.max_iterations
    }

    /// Iterations actually run (the counter overshoots by one on exhaustion).
    pub fn iterations_used(&self) -> usize {
        self.iterations.min(self.max_iterations)
    }

    // ── Rendering ──

    /// Render the trace step by step.
    pub fn render(&self) -> String {
        render_trace(&self.trace, self.max_iterations)
    }
}

/// Render trace entries grouped under `Step i/max` headers.
pub fn render_trace(trace: &[TraceEntry], max_iterations: usize) -> String {
    let mut out = String::new();
    let mut current = 0;

    for entry in trace {
        if entry.iteration != current {
            current = entry.iteration;
            out.push_str(&format!("── Step {current}/{max_iterations} ──\n"));
        }
        out.push_str(&format!("[{}] {}\n", entry.kind.label(), entry.content));
    }

    out
}
