//! Shared test helpers for pattern tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wayfinder_core::error::{ProviderError, ToolError};
use wayfinder_core::provider::{ModelHandle, Provider, ProviderRequest, ProviderResponse, Usage};
use wayfinder_tools::{Coordinates, Extractor, GeoService, Geocoder, SearchHit, SearchProvider, WebSearch};

use crate::dispatcher::Dispatcher;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next response in the queue.
/// Panics if more calls are made than responses provided.
pub struct SequentialMockProvider {
    responses: Vec<String>,
    call_count: Mutex<usize>,
    prompts: Mutex<Vec<String>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: responses.into_iter().map(String::from).collect(),
            call_count: Mutex::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every prompt received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut count = self.call_count.lock().unwrap();

        if *count >= self.responses.len() {
            panic!(
                "SequentialMockProvider: no more responses (call #{}, have {})",
                *count,
                self.responses.len()
            );
        }

        let text = self.responses[*count].clone();
        *count += 1;
        self.prompts.lock().unwrap().push(request.prompt);
        Ok(make_text_response(&text))
    }
}

/// A provider that always answers with the same text.
pub struct RepeatingProvider {
    text: String,
    calls: AtomicUsize,
}

impl RepeatingProvider {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for RepeatingProvider {
    fn name(&self) -> &str {
        "repeating_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(make_text_response(&self.text))
    }
}

/// A provider whose every call fails.
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn name(&self) -> &str {
        "failing_mock"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::AuthenticationFailed("bad key".into()))
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        text: text.to_string(),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

pub fn model(provider: Arc<dyn Provider>) -> ModelHandle {
    ModelHandle::new(provider, "mock-model")
}

/// A geocoder that answers every query the same way and counts calls.
pub struct StubGeocoder {
    answer: Option<Coordinates>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    /// Answers every query with `"lat, lon"`.
    pub fn hit(latlong: &str) -> Self {
        let (lat, lon) = latlong.split_once(", ").unwrap();
        Self {
            answer: Some(Coordinates {
                lat: lat.into(),
                lon: lon.into(),
                display_name: None,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn miss() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    fn name(&self) -> &str {
        "stub"
    }

    async fn lookup(&self, _query: &str) -> Result<Option<Coordinates>, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

/// A search provider returning fixed snippets and counting calls.
pub struct StubSearch {
    snippets: Vec<String>,
    calls: AtomicUsize,
}

impl StubSearch {
    pub fn hits(snippets: &[&str]) -> Self {
        Self {
            snippets: snippets.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::hits(&[])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    fn name(&self) -> &str {
        "stub"
    }

    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .snippets
            .iter()
            .map(|s| SearchHit {
                title: None,
                snippet: s.clone(),
            })
            .collect())
    }
}

/// An offline dispatcher over the given stubs, returning handles to them.
pub fn dispatcher_with(
    geocoder: StubGeocoder,
    search: StubSearch,
) -> (Dispatcher, Arc<StubGeocoder>, Arc<StubSearch>) {
    let geocoder = Arc::new(geocoder);
    let search = Arc::new(search);
    let dispatcher = Dispatcher::new(
        Extractor::offline(),
        WebSearch::new(vec![search.clone()]),
        GeoService::new(geocoder.clone()),
    );
    (dispatcher, geocoder, search)
}
