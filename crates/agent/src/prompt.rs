//! Prompt text fed to the model.

use wayfinder_core::tool::render_catalogue;

/// Sent after a reply the parser could not find an action in.
pub const CORRECTIVE_PROMPT: &str =
    "Please respond with THOUGHT, ACTION, and PARAMETERS in the correct format.";

const RESPONSE_FORMAT: &str = r#"## How to Respond

You must respond in this exact format for EVERY response:

THOUGHT: [Your reasoning about what to do next]
ACTION: [tool_name]
PARAMETERS: {"param1": "value1", "param2": "value2"}"#;

const RULES: &str = r#"## Rules

1. Always start with a THOUGHT explaining your reasoning
2. Use ONE tool at a time
3. After receiving tool results, think about what to do next
4. When you have complete information (name, city, country, coordinates), use "final_answer"
5. If extraction is incomplete, use "search_web" to find more details
6. Always get coordinates before giving final answer"#;

const EXAMPLE: &str = r#"## Example

User: "The ancient temple on Doi Kham hill near Chiang Mai"

THOUGHT: I need to extract location information from this description first.
ACTION: extract_location
PARAMETERS: {"text": "The ancient temple on Doi Kham hill near Chiang Mai"}

[After receiving extraction result]

THOUGHT: I got the name and city, but need to confirm the country. Let me search for more details.
ACTION: search_web
PARAMETERS: {"query": "Doi Kham temple Chiang Mai location"}

[After receiving search result]

THOUGHT: Now I have name=Doi Kham, city=Chiang Mai, country=Thailand. I need coordinates.
ACTION: get_coordinates
PARAMETERS: {"name": "Doi Kham", "city": "Chiang Mai", "country": "Thailand"}

[After receiving coordinates]

THOUGHT: I have all the information. Providing final answer.
ACTION: final_answer
PARAMETERS: {"name": "Doi Kham", "city": "Chiang Mai", "country": "Thailand", "latlong": "18.7654, 98.9321"}"#;

/// The system instructions: role, tool catalogue, reply format, rules, example.
pub fn system_prompt() -> String {
    format!(
        "You are an autonomous location intelligence agent. Your goal is to extract complete \
         location information from user queries and return structured data with coordinates.\n\n\
         ## Available Tools\n\n{}\n\n{RESPONSE_FORMAT}\n\n{RULES}\n\n{EXAMPLE}\n",
        render_catalogue()
    )
}

/// The opening user message for a query.
pub fn task_prompt(query: &str) -> String {
    format!("Find complete location information for: {query}")
}

/// The user message carrying a tool's result back to the model.
pub fn observation_prompt(tool: &str, result: &str) -> String {
    format!("OBSERVATION from {tool}:\n{result}\n\nNow continue with your next THOUGHT and ACTION.")
}
