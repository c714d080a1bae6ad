//! Web search tool backed by a [`SearchProvider`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Number, Value};

use super::{ParamDefault, ParamType, Tool, ToolParam, UserContext};
use crate::search::{format_results, SearchProvider, MAX_RESULTS_LIMIT};

const DEFAULT_MAX_RESULTS: u32 = 5;

const PARAMS: &[ToolParam] = &[
    ToolParam {
        name: "query",
        param_type: ParamType::String,
        description: "The search query",
        required: true,
        default: None,
    },
    ToolParam {
        name: "max_results",
        param_type: ParamType::Integer,
        description: "Maximum number of results to return (default: 5)",
        required: false,
        default: Some(ParamDefault::Integer(DEFAULT_MAX_RESULTS as i64)),
    },
];

#[derive(Debug, Deserialize)]
struct WebSearchArgs {
    query: String,
    /// Any JSON number; models sometimes send `5.0` for an integer.
    #[serde(default)]
    max_results: Option<Number>,
}

/// Search the web and return formatted results.
pub struct WebSearch {
    provider: Arc<dyn SearchProvider>,
}

impl WebSearch {
    pub fn new(provider: Arc<dyn SearchProvider>) -> Self {
        Self { provider }
    }
}

/// Clamp a requested result count into the provider's accepted range.
fn clamp_max_results(requested: Option<&Number>) -> u32 {
    let Some(n) = requested else {
        return DEFAULT_MAX_RESULTS;
    };
    let n = n
        .as_i64()
        .or_else(|| n.as_f64().map(|f| f as i64))
        .unwrap_or(DEFAULT_MAX_RESULTS as i64);
    n.clamp(1, MAX_RESULTS_LIMIT as i64) as u32
}

#[async_trait]
impl Tool for WebSearch {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for information. Returns the title, URL and a content snippet for each result. Call it once per sub-question."
    }

    fn params(&self) -> &'static [ToolParam] {
        PARAMS
    }

    async fn execute(&self, args: Value, _ctx: &UserContext) -> anyhow::Result<String> {
        let args: WebSearchArgs = serde_json::from_value(args)
            .map_err(|e| anyhow::anyhow!("Invalid web_search arguments: {}", e))?;
        let max_results = clamp_max_results(args.max_results.as_ref());

        tracing::info!("web search: {:?} (max_results={})", args.query, max_results);

        let results = self.provider.search(&args.query, max_results).await?;
        Ok(format_results(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{SearchError, SearchResult};
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every call and replays a fixed outcome.
    struct RecordingSearch {
        calls: Mutex<Vec<(String, u32)>>,
        results: Vec<SearchResult>,
        fail: bool,
    }

    impl RecordingSearch {
        fn returning(results: Vec<SearchResult>) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                results,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                results: Vec::new(),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl SearchProvider for RecordingSearch {
        async fn search(
            &self,
            query: &str,
            max_results: u32,
        ) -> Result<Vec<SearchResult>, SearchError> {
            self.calls.lock().unwrap().push((query.to_string(), max_results));
            if self.fail {
                return Err(SearchError::Api {
                    status: 432,
                    body: "usage limit exceeded".to_string(),
                });
            }
            Ok(self.results.clone())
        }
    }

    #[tokio::test]
    async fn defaults_to_five_results() {
        let provider = RecordingSearch::returning(vec![SearchResult::new("t", "u", "c")]);
        let tool = WebSearch::new(provider.clone());

        let out = tool
            .execute(json!({ "query": "rust async" }), &UserContext::default())
            .await
            .unwrap();

        assert_eq!(out, "Title: t\nURL: u\nContent: c");
        assert_eq!(
            *provider.calls.lock().unwrap(),
            vec![("rust async".to_string(), 5)]
        );
    }

    #[tokio::test]
    async fn max_results_is_clamped() {
        let provider = RecordingSearch::returning(Vec::new());
        let tool = WebSearch::new(provider.clone());
        let ctx = UserContext::default();

        tool.execute(json!({ "query": "a", "max_results": 100 }), &ctx)
            .await
            .unwrap();
        tool.execute(json!({ "query": "b", "max_results": 0 }), &ctx)
            .await
            .unwrap();
        tool.execute(json!({ "query": "c", "max_results": 3 }), &ctx)
            .await
            .unwrap();

        let limits: Vec<u32> = provider.calls.lock().unwrap().iter().map(|c| c.1).collect();
        assert_eq!(limits, vec![20, 1, 3]);
    }

    #[tokio::test]
    async fn float_max_results_is_accepted() {
        let provider = RecordingSearch::returning(vec![SearchResult::new("t", "u", "c")]);
        let tool = WebSearch::new(provider.clone());
        let ctx = UserContext::default();

        let out = tool
            .execute(json!({ "query": "x", "max_results": 5.0 }), &ctx)
            .await
            .unwrap();
        assert_eq!(out, "Title: t\nURL: u\nContent: c");

        tool.execute(json!({ "query": "y", "max_results": 2.7 }), &ctx)
            .await
            .unwrap();
        tool.execute(json!({ "query": "z", "max_results": null }), &ctx)
            .await
            .unwrap();

        let limits: Vec<u32> = provider.calls.lock().unwrap().iter().map(|c| c.1).collect();
        assert_eq!(limits, vec![5, 2, 5]);
    }

    #[tokio::test]
    async fn empty_provider_response_is_sentinel() {
        let tool = WebSearch::new(RecordingSearch::returning(Vec::new()));
        let out = tool
            .execute(json!({ "query": "nothing here" }), &UserContext::default())
            .await
            .unwrap();
        assert_eq!(out, "No search results found.");
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let tool = WebSearch::new(RecordingSearch::failing());
        let err = tool
            .execute(json!({ "query": "x" }), &UserContext::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("432"));
    }

    #[tokio::test]
    async fn missing_query_is_rejected() {
        let provider = RecordingSearch::returning(Vec::new());
        let tool = WebSearch::new(provider.clone());
        let err = tool
            .execute(json!({ "max_results": 2 }), &UserContext::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Invalid web_search arguments"));
        assert!(provider.calls.lock().unwrap().is_empty());
    }
}
