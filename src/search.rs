//! Web search provider client (Tavily).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned in place of an empty block when the provider finds nothing.
pub const NO_RESULTS: &str = "No search results found.";

/// Largest `max_results` the provider accepts.
pub const MAX_RESULTS_LIMIT: u32 = 20;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search provider returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One item returned by the search provider.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: Option<f64>,
}

impl SearchResult {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            score: None,
        }
    }
}

/// A backend that turns a query into a ranked list of results.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: u32)
        -> Result<Vec<SearchResult>, SearchError>;
}

/// Render results as Title/URL/Content blocks separated by one blank line.
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }

    results
        .iter()
        .map(|r| format!("Title: {}\nURL: {}\nContent: {}", r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Client for the Tavily search API.
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    search_url: String,
}

#[derive(Serialize)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    max_results: u32,
}

#[derive(Deserialize)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

impl TavilyClient {
    pub fn new(api_key: String, base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl SearchProvider for TavilyClient {
    async fn search(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let response = self
            .http
            .post(&self.search_url)
            .bearer_auth(&self.api_key)
            .json(&TavilySearchRequest { query, max_results })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let body: TavilySearchResponse = serde_json::from_str(&text)?;
        tracing::debug!("tavily returned {} results for {:?}", body.results.len(), query);
        Ok(body.results)
    }
}
