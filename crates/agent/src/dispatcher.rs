//! Turns an [`Action`] plus parameters into a tool call and its observation.
//!
//! Every outcome, including failures, comes back as text for the model.

use serde_json::{Map, Value};
use tracing::{debug, info};
use wayfinder_core::error::ToolError;
use wayfinder_core::location::{LocationField, LocationRecord};
use wayfinder_core::tool::Action;
use wayfinder_tools::{Extractor, GeoService, WebSearch};

/// Longest observation prefix written to the debug log.
const LOG_PREVIEW_CHARS: usize = 200;

/// Routes actions to the extraction, search, and geocoding tools.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    extractor: Extractor,
    search: WebSearch,
    geo: GeoService,
}

impl Dispatcher {
    pub fn new(extractor: Extractor, search: WebSearch, geo: GeoService) -> Self {
        Self {
            extractor,
            search,
            geo,
        }
    }

    /// Run `action` and return its observation. Absent parameters count as empty.
    pub async fn dispatch(&self, action: &Action, parameters: Option<&Map<String, Value>>) -> String {
        let empty = Map::new();
        let params = parameters.unwrap_or(&empty);

        info!(tool = %action, "Executing tool");
        let logged = Value::Object(params.clone());
        debug!(parameters = %logged, "Tool parameters");

        let observation = match self.execute(action, params).await {
            Ok(text) => text,
            Err(e) => format!("Error executing {}: {e}", action.name()),
        };

        debug!(
            result = %observation.chars().take(LOG_PREVIEW_CHARS).collect::<String>(),
            "Tool result"
        );
        observation
    }

    async fn execute(&self, action: &Action, params: &Map<String, Value>) -> Result<String, ToolError> {
        match action {
            Action::ExtractLocation => {
                let text = text_param(params, "text").unwrap_or_default();
                let record = self.extractor.extract(&text).await;
                pretty(&extracted_fields(&record))
            }
            Action::SearchWeb => {
                let query = text_param(params, "query")
                    .filter(|q| !q.trim().is_empty())
                    .ok_or_else(|| ToolError::InvalidArguments("missing 'query'".into()))?;
                Ok(self.search.search(&query).await.to_string())
            }
            Action::GetCoordinates => {
                let place = LocationRecord::from_params(params);
                let outcome = self
                    .geo
                    .locate(
                        place.name.as_deref(),
                        place.city.as_deref(),
                        place.country.as_deref(),
                    )
                    .await;
                Ok(outcome.to_string())
            }
            Action::FinalAnswer => pretty(params),
            Action::Unknown(name) => Ok(format!("Unknown tool: {name}")),
        }
    }
}

/// A string parameter; numbers and booleans are accepted as text.
fn text_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The `name`/`city`/`country` view of a record, absent fields as `null`.
fn extracted_fields(record: &LocationRecord) -> Map<String, Value> {
    LocationField::EXTRACTED
        .into_iter()
        .map(|field| {
            let value = record
                .get(field)
                .map_or(Value::Null, |v| Value::String(v.to_string()));
            (field.as_str().to_string(), value)
        })
        .collect()
}

fn pretty(map: &Map<String, Value>) -> Result<String, ToolError> {
    serde_json::to_string_pretty(map).map_err(|e| ToolError::InvalidResponse {
        service: "json".into(),
        reason: e.to_string(),
    })
}
