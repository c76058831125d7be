//! Web search over a chain of providers.
//!
//! DuckDuckGo's HTML endpoint is tried first and Wikipedia's search API is the
//! fallback. Hits are flattened into one text digest for the agent.

use async_trait::async_trait;
use regex_lite::Regex;
use serde::Deserialize;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, info, warn};
use wayfinder_config::SearchConfig;
use wayfinder_core::error::ToolError;

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: Option<String>,
    pub snippet: String,
}

impl SearchHit {
    pub fn render(&self) -> String {
        match &self.title {
            Some(title) => format!("{title}: {}", self.snippet),
            None => self.snippet.clone(),
        }
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ToolError>;
}

/// Result of a search across the provider chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Hits joined by spaces
    Found(String),
    NoResults(String),
    Failed(String),
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Found(digest) => f.write_str(digest),
            Self::NoResults(query) => write!(f, "No results found for: {query}"),
            Self::Failed(query) => write!(f, "Search failed for: {query}"),
        }
    }
}

/// Tries each provider in order until one returns hits.
#[derive(Clone, Default)]
pub struct WebSearch {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl WebSearch {
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        Self { providers }
    }

    /// DuckDuckGo then Wikipedia, configured from `config`.
    pub fn from_config(config: &SearchConfig) -> Result<Self, ToolError> {
        Ok(Self::new(vec![
            Arc::new(DuckDuckGoSearch::new(config)?),
            Arc::new(WikipediaSearch::new(config)?),
        ]))
    }

    /// Search the chain. When no provider has hits, the last provider's
    /// outcome decides between "no results" and "failed".
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let mut outcome = SearchOutcome::Failed(query.to_string());

        for provider in &self.providers {
            info!(provider = provider.name(), query = %query, "Searching");
            match provider.search(query).await {
                Ok(hits) if !hits.is_empty() => {
                    debug!(provider = provider.name(), count = hits.len(), "Search hits");
                    let digest = hits
                        .iter()
                        .map(SearchHit::render)
                        .collect::<Vec<_>>()
                        .join(" ");
                    return SearchOutcome::Found(digest);
                }
                Ok(_) => {
                    debug!(provider = provider.name(), "No search results, trying next provider");
                    outcome = SearchOutcome::NoResults(query.to_string());
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "Search provider failed");
                    outcome = SearchOutcome::Failed(query.to_string());
                }
            }
        }

        outcome
    }
}

impl std::fmt::Debug for WebSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.providers.iter().map(|p| p.name()).collect();
        f.debug_struct("WebSearch").field("providers", &names).finish()
    }
}

fn http_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client, ToolError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(user_agent.to_string())
        .build()
        .map_err(|e| ToolError::Network(e.to_string()))
}

static TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());

static WHITESPACE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s+").ok());

static DDG_SNIPPET: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</a>"#).ok());

/// Strip markup, decode common entities, and collapse whitespace.
fn clean_html(fragment: &str) -> String {
    let text = match TAG.as_ref() {
        Some(re) => re.replace_all(fragment, "").into_owned(),
        None => fragment.to_string(),
    };
    let text = html_decode(&text);
    let text = match WHITESPACE.as_ref() {
        Some(re) => re.replace_all(&text, " ").into_owned(),
        None => text,
    };
    text.trim().to_string()
}

fn html_decode(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// DuckDuckGo HTML search.
pub struct DuckDuckGoSearch {
    url: String,
    max_results: usize,
    client: reqwest::Client,
}

impl DuckDuckGoSearch {
    pub fn new(config: &SearchConfig) -> Result<Self, ToolError> {
        Ok(Self {
            url: config.duckduckgo_url.clone(),
            max_results: config.max_results,
            client: http_client(&config.user_agent, config.timeout_secs)?,
        })
    }

    fn parse_html(html: &str, max_results: usize) -> Vec<SearchHit> {
        let Some(re) = DDG_SNIPPET.as_ref() else {
            return Vec::new();
        };
        re.captures_iter(html)
            .filter_map(|caps| caps.get(1))
            .take(max_results)
            .map(|m| clean_html(m.as_str()))
            .filter(|snippet| !snippet.is_empty())
            .map(|snippet| SearchHit {
                title: None,
                snippet,
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for DuckDuckGoSearch {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ToolError> {
        let q = format!("{query} location city country");
        let response = self
            .client
            .post(&self.url)
            .form(&[("q", q.as_str())])
            .send()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "DuckDuckGo returned non-success status");
            return Ok(Vec::new());
        }

        let html = response
            .text()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        Ok(Self::parse_html(&html, self.max_results))
    }
}

/// Wikipedia full-text search.
pub struct WikipediaSearch {
    url: String,
    max_results: usize,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct WikiResponse {
    #[serde(default)]
    query: Option<WikiQuery>,
}

#[derive(Debug, Deserialize)]
struct WikiQuery {
    #[serde(default)]
    search: Vec<WikiItem>,
}

#[derive(Debug, Deserialize)]
struct WikiItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

impl WikipediaSearch {
    pub fn new(config: &SearchConfig) -> Result<Self, ToolError> {
        Ok(Self {
            url: config.wikipedia_url.clone(),
            max_results: config.max_results,
            client: http_client(&config.user_agent, config.timeout_secs)?,
        })
    }

    fn hits(response: WikiResponse) -> Vec<SearchHit> {
        response
            .query
            .map(|q| q.search)
            .unwrap_or_default()
            .into_iter()
            .map(|item| SearchHit {
                title: Some(item.title),
                snippet: clean_html(&item.snippet),
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for WikipediaSearch {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ToolError> {
        let limit = self.max_results.to_string();
        let response = self
            .client
            .get(&self.url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("format", "json"),
                ("srlimit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::ExecutionFailed {
                tool_name: "wikipedia".into(),
                reason: format!("HTTP {status}"),
            });
        }

        let body: WikiResponse =
            response
                .json()
                .await
                .map_err(|e| ToolError::InvalidResponse {
                    service: "wikipedia".into(),
                    reason: e.to_string(),
                })?;

        Ok(Self::hits(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns a fixed result.
    struct FixedSearch {
        name: &'static str,
        result: fn() -> Result<Vec<SearchHit>, ToolError>,
    }

    #[async_trait]
    impl SearchProvider for FixedSearch {
        fn name(&self) -> &str {
            self.name
        }

        async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ToolError> {
            (self.result)()
        }
    }

    fn provider(
        name: &'static str,
        result: fn() -> Result<Vec<SearchHit>, ToolError>,
    ) -> Arc<dyn SearchProvider> {
        Arc::new(FixedSearch { name, result })
    }

    fn empty() -> Result<Vec<SearchHit>, ToolError> {
        Ok(vec![])
    }

    fn failing() -> Result<Vec<SearchHit>, ToolError> {
        Err(ToolError::Network("offline".into()))
    }

    fn wiki_hits() -> Result<Vec<SearchHit>, ToolError> {
        Ok(vec![
            SearchHit {
                title: Some("Doi Kham".into()),
                snippet: "a temple near Chiang Mai".into(),
            },
            SearchHit {
                title: None,
                snippet: "Thailand".into(),
            },
        ])
    }

    #[tokio::test]
    async fn falls_back_to_second_provider() {
        let search = WebSearch::new(vec![provider("ddg", failing), provider("wiki", wiki_hits)]);
        let outcome = search.search("Doi Kham").await;
        assert_eq!(
            outcome.to_string(),
            "Doi Kham: a temple near Chiang Mai Thailand"
        );
    }

    #[tokio::test]
    async fn all_empty_is_no_results() {
        let search = WebSearch::new(vec![provider("ddg", empty), provider("wiki", empty)]);
        assert_eq!(
            search.search("xyzzy").await.to_string(),
            "No results found for: xyzzy"
        );
    }

    #[tokio::test]
    async fn all_failed_is_search_failed() {
        let search = WebSearch::new(vec![provider("ddg", failing), provider("wiki", failing)]);
        assert_eq!(
            search.search("xyzzy").await.to_string(),
            "Search failed for: xyzzy"
        );
    }

    #[tokio::test]
    async fn empty_chain_fails() {
        let outcome = WebSearch::default().search("q").await;
        assert_eq!(outcome, SearchOutcome::Failed("q".into()));
    }

    #[test]
    fn duckduckgo_snippets_cleaned_and_capped() {
        let html = r#"
            <a class="result__snippet" href="x">The <b>Doi Kham</b>   temple,
               Chiang Mai &amp; around</a>
            <a class="result__snippet" href="y">Second</a>
            <a class="result__snippet" href="z"><b></b></a>
            <a class="result__snippet" href="w">Fourth</a>
        "#;
        let hits = DuckDuckGoSearch::parse_html(html, 3);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].snippet, "The Doi Kham temple, Chiang Mai & around");
        assert_eq!(hits[1].render(), "Second");
    }

    #[test]
    fn wikipedia_items_become_titled_hits() {
        let body: WikiResponse = serde_json::from_str(
            r#"{"query": {"search": [
                {"title": "Colosseum", "snippet": "ancient <span class=\"searchmatch\">amphitheatre</span> in Rome"}
            ]}}"#,
        )
        .unwrap();
        let hits = WikipediaSearch::hits(body);
        assert_eq!(hits[0].render(), "Colosseum: ancient amphitheatre in Rome");

        let empty: WikiResponse = serde_json::from_str("{}").unwrap();
        assert!(WikipediaSearch::hits(empty).is_empty());
    }
}
