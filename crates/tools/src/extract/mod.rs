//! Location extraction engine.
//!
//! Two passes over a text description:
//!
//! 1. The model restates the text as `name: …, city: …, country: …` and the
//!    full pattern cascade runs over its reply, so a prose answer still counts.
//! 2. The full pattern cascade runs over the original text and fills whatever
//!    the model left absent. Model values are never replaced.
//!
//! The engine never fails: a model error is logged and the text pass alone
//! decides the result.

pub mod gazetteer;
pub mod rules;

use tracing::{debug, warn};
use wayfinder_core::location::LocationRecord;
use wayfinder_core::provider::ModelHandle;

/// Extracts a [`LocationRecord`] from free text.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    model: Option<ModelHandle>,
}

impl Extractor {
    /// An extractor that asks `model` first, then runs the text heuristics.
    pub fn new(model: ModelHandle) -> Self {
        Self { model: Some(model) }
    }

    /// An extractor that only runs the text heuristics.
    pub fn offline() -> Self {
        Self { model: None }
    }

    pub async fn extract(&self, text: &str) -> LocationRecord {
        if text.trim().is_empty() {
            return LocationRecord::new();
        }

        let mut record = LocationRecord::new();

        if let Some(model) = &self.model {
            match model.run(&extraction_prompt(text)).await {
                Ok(reply) => {
                    rules::apply(&reply, &mut record);
                    debug!(%record, "Model extraction pass");
                }
                Err(e) => warn!(error = %e, "Model extraction failed, using text heuristics only"),
            }
        }

        rules::apply(text, &mut record);
        record
    }
}

/// Run the pattern cascade alone.
pub fn extract_from_text(text: &str) -> LocationRecord {
    let mut record = LocationRecord::new();
    if !text.trim().is_empty() {
        rules::apply(text, &mut record);
    }
    record
}

/// The prompt asking the model to restate `text` as labeled fields.
pub fn extraction_prompt(text: &str) -> String {
    format!(
        "Extract the location name, city, and country from this text.\n\n\
         Text: {text}\n\n\
         Answer in format: name: [name], city: [city], country: [country]"
    )
}

/// Capitalise the first letter of every alphabetic run and lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use wayfinder_core::error::ProviderError;
    use wayfinder_core::provider::{Provider, ProviderRequest, ProviderResponse};

    /// Replies with a fixed text and records every prompt.
    struct CannedProvider {
        reply: Result<String, ProviderError>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedProvider {
        fn handle(reply: Result<String, ProviderError>) -> (ModelHandle, Arc<Self>) {
            let provider = Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            });
            (ModelHandle::new(provider.clone(), "test"), provider)
        }
    }

    #[async_trait]
    impl Provider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            self.prompts.lock().unwrap().push(request.prompt);
            self.reply.clone().map(|text| ProviderResponse {
                text,
                model: "test".into(),
                usage: None,
            })
        }
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("chiang MAI"), "Chiang Mai");
        assert_eq!(title_case("the o'neil bar"), "The O'Neil Bar");
    }

    #[test]
    fn blank_text_is_empty_record() {
        assert_eq!(extract_from_text(""), LocationRecord::new());
        assert_eq!(extract_from_text("   \n\t"), LocationRecord::new());
    }

    #[tokio::test]
    async fn blank_text_skips_the_model() {
        let (model, provider) = CannedProvider::handle(Ok("name: X".into()));
        let record = Extractor::new(model).extract("  ").await;
        assert_eq!(record, LocationRecord::new());
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn model_values_win_over_text() {
        let (model, provider) = CannedProvider::handle(Ok(
            "name: Wat Phra That Doi Kham, city: unknown, country: null".into(),
        ));
        let record = Extractor::new(model)
            .extract("The ancient temple on Doi Kham hill near Chiang Mai")
            .await;

        assert_eq!(record.name.as_deref(), Some("Wat Phra That Doi Kham"));
        assert_eq!(record.city.as_deref(), Some("Chiang Mai"));
        assert_eq!(record.country.as_deref(), Some("Thailand"));

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Text: The ancient temple"));
        assert!(prompts[0].ends_with("country: [country]"));
    }

    #[tokio::test]
    async fn prose_model_reply_still_fills_fields() {
        let (model, _) = CannedProvider::handle(Ok("The Colosseum is in Rome, Italy.".into()));
        let record = Extractor::new(model)
            .extract("that big old arena where gladiators fought")
            .await;
        assert_eq!(record.name.as_deref(), Some("The Colosseum"));
        assert_eq!(record.city.as_deref(), Some("Rome"));
        assert_eq!(record.country.as_deref(), Some("Italy"));
    }

    #[tokio::test]
    async fn model_failure_falls_back_to_text() {
        let (model, _) =
            CannedProvider::handle(Err(ProviderError::Network("connection refused".into())));
        let record = Extractor::new(model)
            .extract("A small museum in Kyoto, Japan.")
            .await;
        assert_eq!(record.city.as_deref(), Some("Kyoto"));
        assert_eq!(record.country.as_deref(), Some("Japan"));
    }

    #[tokio::test]
    async fn offline_extractor_uses_heuristics() {
        let record = Extractor::offline()
            .extract("The ancient temple on Doi Kham hill near Chiang Mai")
            .await;
        assert_eq!(record.name.as_deref(), Some("Doi Kham"));
        assert_eq!(record.city.as_deref(), Some("Chiang Mai"));
        assert_eq!(record.country.as_deref(), Some("Thailand"));
    }
}
