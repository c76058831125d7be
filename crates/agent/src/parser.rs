//! Parses one model reply into a [`ParsedDecision`].
//!
//! The expected shape is
//!
//! ```text
//! THOUGHT: <reasoning>
//! ACTION: <tool_name>
//! PARAMETERS: {"key": "value"}
//! ```
//!
//! Labels are matched case-insensitively. Parsing never fails: anything that
//! cannot be read is simply absent from the decision.

use serde_json::{Map, Value};
use wayfinder_core::tool::Action;

const THOUGHT: &str = "thought:";
const ACTION: &str = "action:";
const PARAMETERS: &str = "parameters:";

/// What the model decided to do in one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDecision {
    pub thought: Option<String>,
    /// The raw action token as the model wrote it
    pub action: Option<String>,
    pub parameters: Option<Map<String, Value>>,
}

impl ParsedDecision {
    pub fn parse(raw: &str) -> Self {
        // ASCII lowercasing keeps byte offsets aligned with `raw`.
        let lower = raw.to_ascii_lowercase();
        Self {
            thought: parse_thought(raw, &lower),
            action: parse_action(raw, &lower),
            parameters: parse_parameters(raw, &lower),
        }
    }

    /// The classified action, if one was present.
    pub fn action(&self) -> Option<Action> {
        self.action.as_deref().map(Action::parse)
    }

    /// Render in the canonical reply format.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if let Some(thought) = &self.thought {
            lines.push(format!("THOUGHT: {thought}"));
        }
        if let Some(action) = &self.action {
            lines.push(format!("ACTION: {action}"));
        }
        if let Some(parameters) = &self.parameters {
            let json = serde_json::to_string(parameters).unwrap_or_else(|_| "{}".into());
            lines.push(format!("PARAMETERS: {json}"));
        }
        lines.join("\n")
    }
}

fn parse_thought(raw: &str, lower: &str) -> Option<String> {
    let start = lower.find(THOUGHT)? + THOUGHT.len();
    let end = lower[start..]
        .find(ACTION)
        .map_or(raw.len(), |offset| start + offset);
    let thought = raw[start..end].trim();
    (!thought.is_empty()).then(|| thought.to_string())
}

/// The word after the first `ACTION:` label that has one.
///
/// A following label (`ACTION:\nACTION: x`) is not a word.
fn parse_action(raw: &str, lower: &str) -> Option<String> {
    lower.match_indices(ACTION).find_map(|(at, _)| {
        let rest = raw[at + ACTION.len()..].trim_start();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        let word = &rest[..len];
        let is_label = rest[len..].starts_with(':');
        (!word.is_empty() && !is_label).then(|| word.to_string())
    })
}

fn parse_parameters(raw: &str, lower: &str) -> Option<Map<String, Value>> {
    let after_label = lower.find(PARAMETERS)? + PARAMETERS.len();
    let open = after_label + raw[after_label..].find('{')?;
    let close = matching_brace(&raw[open..])? + open;
    let span = &raw[open..=close];

    if let Ok(map) = serde_json::from_str::<Map<String, Value>>(span) {
        return Some(map);
    }
    let repaired = span.replace('\'', "\"");
    Some(serde_json::from_str::<Map<String, Value>>(&repaired).unwrap_or_default())
}

/// Byte offset of the brace closing the one at the start of `s`.
///
/// Braces inside quoted strings do not count.
fn matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
