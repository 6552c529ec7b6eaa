pub mod domain;
pub mod itinerary;
pub mod llm;
pub mod search;
pub mod weather;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub serpapi_key: Option<String>,
        pub weather_api_key: Option<String>,
        pub genai_api_key: Option<String>,
        pub anthropic_api_key: Option<String>,
        pub llm_provider: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                serpapi_key: non_empty_var("SERPAPI_KEY"),
                weather_api_key: non_empty_var("WEATHER_API_KEY"),
                genai_api_key: non_empty_var("GENAI_API_KEY"),
                anthropic_api_key: non_empty_var("ANTHROPIC_API_KEY"),
                llm_provider: non_empty_var("LLM_PROVIDER"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_serpapi_key(&self) -> anyhow::Result<&str> {
            self.serpapi_key
                .as_deref()
                .context("SERPAPI_KEY is required")
        }

        pub fn require_weather_api_key(&self) -> anyhow::Result<&str> {
            self.weather_api_key
                .as_deref()
                .context("WEATHER_API_KEY is required")
        }

        pub fn require_genai_api_key(&self) -> anyhow::Result<&str> {
            self.genai_api_key
                .as_deref()
                .context("GENAI_API_KEY is required")
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Reads a numeric tuning knob, falling back when unset or unparsable.
    pub fn env_u64(key: &str, default: u64) -> u64 {
        std::env::var(key)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(default)
    }

    pub fn env_or(key: &str, default: &str) -> String {
        std::env::var(key)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}
