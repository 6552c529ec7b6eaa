use crate::llm::Provider;
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Non-2xx status from the provider.
    Http,
    /// A 2xx reply that carried no usable text.
    EmptyOutput,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Http => "http",
            Stage::EmptyOutput => "empty_output",
        }
    }
}

/// A generator call that reached the provider but produced no itinerary text.
/// Keeps the raw body for Sentry and logs.
#[derive(Debug, Clone)]
pub struct GenerationError {
    pub provider: Provider,
    pub stage: Stage,
    pub detail: String,
    pub raw_output: Option<String>,
    pub raw_response_json: Option<Value>,
}

impl GenerationError {
    pub fn http(provider: Provider, status: reqwest::StatusCode, body: String) -> Self {
        Self {
            provider,
            stage: Stage::Http,
            detail: format!("status={status}"),
            raw_response_json: serde_json::from_str(&body).ok(),
            raw_output: Some(body),
        }
    }

    pub fn empty_output(provider: Provider, detail: impl Into<String>, raw_output: Option<String>) -> Self {
        Self {
            provider,
            stage: Stage::EmptyOutput,
            detail: detail.into(),
            raw_response_json: raw_output.as_deref().and_then(|s| serde_json::from_str(s).ok()),
            raw_output,
        }
    }

    /// The first `max_chars` characters of the raw provider body.
    pub fn raw_excerpt(&self, max_chars: usize) -> Option<String> {
        let raw = self.raw_output.as_deref()?;
        Some(raw.chars().take(max_chars).collect())
    }

    /// `error.message` from the provider's JSON body. Gemini and Anthropic both use that path.
    pub fn provider_message(&self) -> Option<&str> {
        self.raw_response_json
            .as_ref()?
            .get("error")?
            .get("message")?
            .as_str()
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "text generation failed (provider={:?}, stage={}): {}",
            self.provider,
            self.stage.as_str(),
            self.detail
        )?;
        if let Some(message) = self.provider_message() {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for GenerationError {}
