use crate::config::Settings;
use std::sync::Arc;

pub mod anthropic;
pub mod error;
pub mod gemini;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Gemini,
    Anthropic,
}

impl Provider {
    pub fn from_name(name: Option<&str>) -> anyhow::Result<Self> {
        match name.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("gemini") => Ok(Provider::Gemini),
            Some("anthropic") => Ok(Provider::Anthropic),
            Some(other) => anyhow::bail!("unknown LLM_PROVIDER {other:?} (expected gemini or anthropic)"),
        }
    }
}

/// Free-form prompt in, free-form text out.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    fn provider(&self) -> Provider;

    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

pub fn from_settings(settings: &Settings) -> anyhow::Result<Arc<dyn TextGenerator>> {
    let generator: Arc<dyn TextGenerator> = match Provider::from_name(settings.llm_provider.as_deref())? {
        Provider::Gemini => Arc::new(gemini::GeminiClient::from_settings(settings)?),
        Provider::Anthropic => Arc::new(anthropic::AnthropicClient::from_settings(settings)?),
    };
    Ok(generator)
}
