use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

pub mod serpapi;

pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// One organic web result, in provider relevance order. Missing, null or
/// non-string fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub link: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub snippet: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub source: String,
}

fn string_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string).unwrap_or_default())
}

#[derive(Debug, Clone)]
pub enum SearchError {
    Transport(String),
    Http { status: u16, body: String },
    Decode(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Transport(detail) => write!(f, "search request failed: {detail}"),
            SearchError::Http { status, body } => write!(f, "search HTTP {status}: {body}"),
            SearchError::Decode(detail) => write!(f, "search response could not be decoded: {detail}"),
        }
    }
}

impl std::error::Error for SearchError {}

#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError>;
}

/// Runs a search and degrades to an empty list when the provider fails.
pub async fn search_or_empty(
    provider: &dyn SearchProvider,
    query: &str,
    limit: usize,
) -> Vec<SearchResult> {
    match provider.search(query, limit).await {
        Ok(results) => {
            tracing::debug!(
                provider = provider.provider_name(),
                query,
                results = results.len(),
                "web search done"
            );
            results
        }
        Err(err) => {
            tracing::warn!(
                provider = provider.provider_name(),
                query,
                error = %err,
                "web search failed; continuing without results"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticSearch;

    #[tokio::test]
    async fn failure_degrades_to_empty_list() {
        let provider = StaticSearch::failing();
        let results = search_or_empty(&provider, "Best travel guide for Paris Food", 5).await;
        assert!(results.is_empty());
        assert_eq!(provider.queries(), vec!["Best travel guide for Paris Food".to_string()]);
    }

    #[tokio::test]
    async fn passes_results_through_in_order() {
        let provider = StaticSearch::with_titles(&["b", "a", "a"]);
        let results = search_or_empty(&provider, "q", 5).await;
        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "a"]);
    }
}
