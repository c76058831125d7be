//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, llama.cpp, Together AI,
//! and any endpoint exposing `/v1/chat/completions`.
//!
//! The agent speaks to the model in one rendered prompt string, so each
//! request is sent as a single user message and the first choice's content
//! is returned as the completion text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wayfinder_core::error::ProviderError;
use wayfinder_core::provider::*;

/// An OpenAI-compatible LLM provider.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a new OpenAI-compatible provider.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Create an OpenRouter provider (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key)
    }

    /// Create an OpenAI provider (convenience constructor).
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new("openai", "https://api.openai.com/v1", api_key)
    }

    /// Create an Ollama provider (convenience constructor).
    pub fn ollama(base_url: Option<&str>) -> Self {
        Self::new(
            "ollama",
            base_url.unwrap_or("http://localhost:11434/v1"),
            "ollama", // Ollama doesn't need a real key
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the chat-completions body for a prompt request.
    fn request_body(request: &ProviderRequest) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": request.model,
            "messages": [ApiMessage {
                role: "user".into(),
                content: Some(request.prompt.clone()),
            }],
            "temperature": request.temperature,
            "stream": false,
        });

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        if !request.stop.is_empty() {
            body["stop"] = serde_json::json!(request.stop);
        }

        body
    }

    /// Turn a decoded API response into a [`ProviderResponse`].
    fn into_response(api_response: ApiResponse) -> Result<ProviderResponse, ProviderError> {
        let choice =
            api_response
                .choices
                .into_iter()
                .next()
                .ok_or_else(|| ProviderError::ApiError {
                    status_code: 200,
                    message: "No choices in response".into(),
                })?;

        let usage = api_response.usage.map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        Ok(ProviderResponse {
            text: choice.message.content.unwrap_or_default(),
            model: api_response.model,
            usage,
        })
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::request_body(&request);

        debug!(provider = %self.name, model = %request.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                status_code: 200,
                message: format!("Failed to parse response: {e}"),
            })?;

        Self::into_response(api_response)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    model: String,
    choices: Vec<ApiChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> ProviderRequest {
        ProviderRequest {
            model: "llama3.1".into(),
            prompt: prompt.into(),
            temperature: 0.2,
            max_tokens: None,
            stop: vec![],
        }
    }

    #[test]
    fn openrouter_constructor() {
        let provider = OpenAiCompatProvider::openrouter("sk-test");
        assert_eq!(provider.name(), "openrouter");
        assert!(provider.base_url().contains("openrouter.ai"));
    }

    #[test]
    fn ollama_constructor() {
        let provider = OpenAiCompatProvider::ollama(None);
        assert_eq!(provider.name(), "ollama");
        assert!(provider.base_url().contains("localhost:11434"));
    }

    #[test]
    fn trailing_slash_trimmed() {
        let provider = OpenAiCompatProvider::new("vllm", "http://localhost:8000/v1/", "");
        assert_eq!(provider.base_url(), "http://localhost:8000/v1");
    }

    #[test]
    fn prompt_sent_as_single_user_message() {
        let body = OpenAiCompatProvider::request_body(&request("System Instructions:\nhi\n"));
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "System Instructions:\nhi\n");
        assert_eq!(body["stream"], false);
        assert!(body.get("max_tokens").is_none());
        assert!(body.get("stop").is_none());
    }

    #[test]
    fn optional_fields_included_when_set() {
        let mut req = request("p");
        req.max_tokens = Some(512);
        req.stop = vec!["OBSERVATION".into()];
        let body = OpenAiCompatProvider::request_body(&req);
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["stop"][0], "OBSERVATION");
    }

    #[test]
    fn parse_completion_response() {
        let raw = r#"{
            "model": "llama3.1:8b",
            "choices": [{"message": {"role": "assistant", "content": "THOUGHT: ok"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13}
        }"#;
        let api: ApiResponse = serde_json::from_str(raw).unwrap();
        let response = OpenAiCompatProvider::into_response(api).unwrap();
        assert_eq!(response.text, "THOUGHT: ok");
        assert_eq!(response.model, "llama3.1:8b");
        assert_eq!(response.usage.unwrap().total_tokens, 13);
    }

    #[test]
    fn empty_choices_is_an_api_error() {
        let api: ApiResponse =
            serde_json::from_str(r#"{"model": "m", "choices": [], "usage": null}"#).unwrap();
        let err = OpenAiCompatProvider::into_response(api).unwrap_err();
        assert!(err.to_string().contains("No choices"));
    }

    #[test]
    fn null_content_becomes_empty_text() {
        let api: ApiResponse = serde_json::from_str(
            r#"{"model": "m", "choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        let response = OpenAiCompatProvider::into_response(api).unwrap();
        assert!(response.text.is_empty());
        assert!(response.usage.is_none());
    }
}
