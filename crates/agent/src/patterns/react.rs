//! ReAct pattern: Thought → Action → Observation loop.
//!
//! The agent asks the model for one decision per iteration, runs the chosen
//! tool, and feeds the observation back until the model calls
//! `final_answer` or the iteration budget runs out. All reasoning steps are
//! recorded in working memory and are fully inspectable.
//!
//! # Trace Format
//!
//! Each iteration records:
//! - **Response**: The raw model reply
//! - **Thought**: The reasoning parsed from the reply
//! - **Action**: Which tool was called with what parameters
//! - **Observation**: The tool execution result
//! - **Retry**: The reply carried no action and the model was re-prompted

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use wayfinder_core::error::AgentError;
use wayfinder_core::location::LocationRecord;
use wayfinder_core::message::{Conversation, Message};
use wayfinder_core::provider::ModelHandle;

use crate::context::working_memory::{TraceEntry, WorkingMemory, render_trace};
use crate::dispatcher::Dispatcher;
use crate::parser::ParsedDecision;
use crate::prompt::{CORRECTIVE_PROMPT, observation_prompt, system_prompt, task_prompt};

/// Iteration budget used unless overridden.
pub const DEFAULT_MAX_ITERATIONS: u32 = 10;

/// The ReAct location agent.
#[derive(Debug, Clone)]
pub struct ReactAgent {
    /// Language model driving the decisions.
    model: ModelHandle,
    /// Tool router.
    dispatcher: Dispatcher,
    /// Maximum reasoning iterations.
    max_iterations: u32,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The model called `final_answer`.
    Answered,
    /// The iteration budget ran out first.
    BudgetExhausted,
}

/// The result of a ReAct execution.
#[derive(Debug, Clone)]
pub struct AgentResult {
    /// The `final_answer` parameters, or the budget-exhausted record.
    pub answer: Map<String, Value>,
    pub outcome: Outcome,
    /// Number of iterations used.
    pub iterations: usize,
    /// Total tool calls made (the terminal action is not counted).
    pub tool_calls_made: usize,
    /// Complete reasoning trace.
    pub trace: Vec<TraceEntry>,
    /// The full conversation as sent to the model.
    pub conversation: Conversation,
    max_iterations: usize,
}

impl AgentResult {
    pub fn is_answered(&self) -> bool {
        self.outcome == Outcome::Answered
    }

    /// The answer read as a location record, unchecked.
    pub fn record(&self) -> LocationRecord {
        LocationRecord::from_params(&self.answer)
    }

    /// The answer as a record, failing if any answer field is absent.
    pub fn validated(&self) -> Result<LocationRecord, AgentError> {
        let record = self.record();
        let missing = record.missing_answer_fields();
        if missing.is_empty() {
            Ok(record)
        } else {
            Err(AgentError::IncompleteAnswer {
                missing: missing.iter().map(|f| f.as_str().to_string()).collect(),
            })
        }
    }

    /// Render the trace step by step.
    pub fn render_trace(&self) -> String {
        render_trace(&self.trace, self.max_iterations)
    }
}

impl ReactAgent {
    /// Create a new ReAct agent.
    pub fn new(model: ModelHandle, dispatcher: Dispatcher) -> Self {
        Self {
            model,
            dispatcher,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Set max iterations.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Execute the ReAct loop for one location description.
    ///
    /// Malformed replies cost an iteration and trigger a corrective prompt.
    /// Model failures abort the run.
    pub async fn run(&self, query: &str) -> Result<AgentResult, wayfinder_core::Error> {
        let mut wm = WorkingMemory::new(self.max_iterations as usize);
        let mut conversation = Conversation::new();
        let mut total_tool_calls = 0usize;

        conversation.push(Message::system(system_prompt()));
        conversation.push(Message::user(task_prompt(query)));

        info!(
            model = %self.model.model(),
            max_iter = self.max_iterations,
            "ReAct loop starting"
        );

        while wm.tick() {
            debug!(iteration = wm.iterations, max = self.max_iterations, "ReAct iteration");

            // ── Call LLM ──
            let reply = self.model.run(&conversation.render_prompt()).await?;
            wm.add_response(&reply);
            debug!(response = %reply, "Model reply");

            let decision = ParsedDecision::parse(&reply);

            let Some(action) = decision.action() else {
                warn!(iteration = wm.iterations, "Reply had no ACTION, re-prompting");
                wm.add_retry(CORRECTIVE_PROMPT);
                conversation.push(Message::assistant(reply));
                conversation.push(Message::user(CORRECTIVE_PROMPT));
                continue;
            };

            // ── Record thought and action ──
            if let Some(thought) = &decision.thought {
                wm.add_thought(thought);
            }
            let parameters = decision.parameters.unwrap_or_default();
            wm.add_action(&format!("{}({})", action, Value::Object(parameters.clone())));

            // ── Check for final answer ──
            if action.is_terminal() {
                conversation.push(Message::assistant(reply));
                info!(
                    iterations = wm.iterations,
                    tool_calls = total_tool_calls,
                    "ReAct loop completed"
                );
                return Ok(AgentResult {
                    answer: parameters,
                    outcome: Outcome::Answered,
                    iterations: wm.iterations_used(),
                    tool_calls_made: total_tool_calls,
                    trace: wm.trace,
                    conversation,
                    max_iterations: wm.max_iterations,
                });
            }

            // ── Execute tool ──
            total_tool_calls += 1;
            let observation = self.dispatcher.dispatch(&action, Some(&parameters)).await;
            wm.add_observation(&observation);

            conversation.push(Message::assistant(reply));
            conversation.push(Message::user(observation_prompt(action.name(), &observation)));
        }

        warn!("ReAct: max iterations reached ({})", self.max_iterations);

        Ok(AgentResult {
            answer: LocationRecord::budget_exhausted().to_params(),
            outcome: Outcome::BudgetExhausted,
            iterations: wm.iterations_used(),
            tool_calls_made: total_tool_calls,
            trace: wm.trace,
            conversation,
            max_iterations: wm.max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TraceKind;
    use crate::patterns::test_helpers::{
        FailingProvider, RepeatingProvider, SequentialMockProvider, StubGeocoder, StubSearch,
        dispatcher_with, model,
    };
    use serde_json::json;
    use std::sync::Arc;
    use wayfinder_core::error::{Error, ProviderError};

    fn setup(provider: Arc<dyn wayfinder_core::provider::Provider>) -> ReactAgent {
        let (dispatcher, _, _) = dispatcher_with(StubGeocoder::miss(), StubSearch::empty());
        ReactAgent::new(model(provider), dispatcher)
    }

    #[tokio::test]
    async fn immediate_final_answer() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            "THOUGHT: I already know this.\nACTION: final_answer\nPARAMETERS: {\"name\": \"Colosseum\", \"city\": \"Rome\", \"country\": \"Italy\", \"latlong\": \"41.89, 12.49\"}",
        ]));
        let agent = setup(provider.clone());

        let result = agent.run("the Colosseum").await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert!(result.is_answered());
        assert_eq!(result.iterations, 1);
        assert_eq!(result.tool_calls_made, 0);
        assert_eq!(result.answer["city"], "Rome");
        assert_eq!(result.validated().unwrap().latlong.as_deref(), Some("41.89, 12.49"));
    }

    #[tokio::test]
    async fn final_answer_is_passed_through_exactly() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            "ACTION: FINAL_ANSWER\nPARAMETERS: {\"name\": \"Doi Kham\", \"rating\": 5}",
        ]));
        let result = setup(provider).run("Doi Kham").await.unwrap();

        assert_eq!(
            Value::Object(result.answer.clone()),
            json!({"name": "Doi Kham", "rating": 5})
        );
        let err = result.validated().unwrap_err();
        assert_eq!(
            err,
            AgentError::IncompleteAnswer {
                missing: vec!["city".into(), "country".into(), "latlong".into()]
            }
        );
    }

    #[tokio::test]
    async fn absent_final_parameters_are_empty() {
        let provider = Arc::new(SequentialMockProvider::new(vec!["ACTION: final_answer"]));
        let result = setup(provider).run("somewhere").await.unwrap();
        assert!(result.is_answered());
        assert!(result.answer.is_empty());
    }

    #[tokio::test]
    async fn never_valid_model_exhausts_budget() {
        let provider = Arc::new(RepeatingProvider::new("I think it is somewhere in Europe."));
        let agent = setup(provider.clone()).with_max_iterations(3);

        let result = agent.run("a place").await.unwrap();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(result.outcome, Outcome::BudgetExhausted);
        assert_eq!(result.iterations, 3);
        assert_eq!(
            Value::Object(result.answer.clone()),
            json!({
                "name": null,
                "city": null,
                "country": null,
                "latlong": null,
                "error": "Max iterations reached"
            })
        );
        let retries = result
            .trace
            .iter()
            .filter(|e| e.kind == TraceKind::Retry)
            .count();
        assert_eq!(retries, 3);
    }

    #[tokio::test]
    async fn corrective_prompt_follows_malformed_reply() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            "Let me think about this.",
            "THOUGHT: done\nACTION: final_answer\nPARAMETERS: {}",
        ]));
        let result = setup(provider.clone()).run("x").await.unwrap();

        assert_eq!(result.iterations, 2);
        let second_prompt = &provider.prompts()[1];
        assert!(second_prompt.contains("Assistant: Let me think about this."));
        assert!(second_prompt.contains(&format!("User: {CORRECTIVE_PROMPT}")));
    }

    #[tokio::test]
    async fn unknown_tool_becomes_observation() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            "THOUGHT: go there\nACTION: teleport\nPARAMETERS: {\"to\": \"Mars\"}",
            "ACTION: final_answer\nPARAMETERS: {}",
        ]));
        let result = setup(provider.clone()).run("Mars").await.unwrap();

        assert_eq!(result.tool_calls_made, 1);
        let observation = result
            .trace
            .iter()
            .find(|e| e.kind == TraceKind::Observation)
            .unwrap();
        assert_eq!(observation.content, "Unknown tool: teleport");
        assert!(provider.prompts()[1].contains("OBSERVATION from teleport:\nUnknown tool: teleport"));
    }

    #[tokio::test]
    async fn null_coordinates_make_no_network_call() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            "ACTION: get_coordinates\nPARAMETERS: {\"name\": null, \"city\": null, \"country\": null}",
            "ACTION: final_answer\nPARAMETERS: {}",
        ]));
        let (dispatcher, geocoder, _) = dispatcher_with(StubGeocoder::miss(), StubSearch::empty());
        let agent = ReactAgent::new(model(provider.clone()), dispatcher);

        agent.run("nothing").await.unwrap();

        assert_eq!(geocoder.calls(), 0);
        assert!(provider.prompts()[1].contains("No location data to geocode"));
    }

    #[tokio::test]
    async fn full_tool_sequence_records_trace() {
        let provider = Arc::new(SequentialMockProvider::new(vec![
            "THOUGHT: extract first\nACTION: extract_location\nPARAMETERS: {\"text\": \"The ancient temple on Doi Kham hill near Chiang Mai\"}",
            "THOUGHT: confirm\nACTION: search_web\nPARAMETERS: {\"query\": \"Doi Kham temple\"}",
            "THOUGHT: coordinates\nACTION: get_coordinates\nPARAMETERS: {\"name\": \"Doi Kham\", \"city\": \"Chiang Mai\", \"country\": \"Thailand\"}",
            "THOUGHT: done\nACTION: final_answer\nPARAMETERS: {\"name\": \"Doi Kham\", \"city\": \"Chiang Mai\", \"country\": \"Thailand\", \"latlong\": \"18.8, 98.9\"}",
        ]));
        let (dispatcher, geocoder, search) = dispatcher_with(
            StubGeocoder::hit("18.8, 98.9"),
            StubSearch::hits(&["Wat Doi Kham is a temple in Chiang Mai, Thailand"]),
        );
        let agent = ReactAgent::new(model(provider.clone()), dispatcher);

        let result = agent.run("The ancient temple on Doi Kham hill near Chiang Mai").await.unwrap();

        assert_eq!(result.iterations, 4);
        assert_eq!(result.tool_calls_made, 3);
        assert_eq!(geocoder.calls(), 1);
        assert_eq!(search.calls(), 1);
        assert!(result.validated().is_ok());

        let prompts = provider.prompts();
        assert!(prompts[0].starts_with("System Instructions:\n"));
        assert!(prompts[0].contains("User: Find complete location information for: The ancient temple"));
        assert!(prompts[1].contains("\"city\": \"Chiang Mai\""));
        assert!(prompts[3].contains("OBSERVATION from get_coordinates:\n18.8, 98.9"));

        let rendered = result.render_trace();
        assert!(rendered.contains("── Step 1/10 ──"));
        assert!(rendered.contains("── Step 4/10 ──"));
        assert!(rendered.contains("[Thought] extract first"));
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let agent = setup(Arc::new(FailingProvider));
        let err = agent.run("anything").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Provider(ProviderError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn zero_budget_makes_no_calls() {
        let provider = Arc::new(RepeatingProvider::new("ACTION: final_answer"));
        let agent = setup(provider.clone()).with_max_iterations(0);
        let result = agent.run("x").await.unwrap();
        assert_eq!(provider.call_count(), 0);
        assert_eq!(result.outcome, Outcome::BudgetExhausted);
        assert_eq!(result.iterations, 0);
    }
}
