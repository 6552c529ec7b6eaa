use crate::config::{env_or, env_u64, Settings};
use crate::search::{SearchError, SearchProvider, SearchResult};
use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://serpapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const SEARCH_PATH: &str = "/search";

#[derive(Debug, Clone)]
pub struct SerpApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl SerpApiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_serpapi_key()?.to_string();
        let base_url = env_or("SERPAPI_BASE_URL", DEFAULT_BASE_URL);
        let timeout_secs = env_u64("SERPAPI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build SerpAPI http client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SEARCH_PATH)
    }
}

#[async_trait::async_trait]
impl SearchProvider for SerpApiClient {
    fn provider_name(&self) -> &'static str {
        "serpapi"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        let num = limit.to_string();
        let res = self
            .http
            .get(self.url())
            .query(&[
                ("engine", "google"),
                ("q", query),
                ("api_key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(SearchError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_organic_results(&text, limit)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<Value>,
}

/// Decodes at most `limit` results. Items that are not objects are skipped
/// so one odd entry does not cost the rest of the page.
fn parse_organic_results(text: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
    let parsed = serde_json::from_str::<SearchResponse>(text)
        .map_err(|e| SearchError::Decode(e.to_string()))?;
    Ok(parsed
        .organic_results
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value::<SearchResult>(item).ok())
        .take(limit)
        .collect())
}
