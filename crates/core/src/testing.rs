//! In-memory providers for tests. Each fake records the calls it receives.

use crate::llm::error::GenerationError;
use crate::llm::{Provider, TextGenerator};
use crate::search::{SearchError, SearchProvider, SearchResult};
use crate::weather::{ForecastDay, LocationMatch, RawForecast, WeatherError, WeatherProvider};
use chrono::{Duration, NaiveDate};
use std::sync::Mutex;

/// A forecast day `offset` days after 2026-05-01.
pub fn forecast_day(offset: i64, condition: &str, max: f64, min: f64, precip_mm: f64) -> ForecastDay {
    let base = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
    ForecastDay {
        date: base + Duration::days(offset),
        condition: condition.to_string(),
        max_temp_c: max,
        min_temp_c: min,
        precip_mm,
    }
}

pub struct StaticSearch {
    results: Result<Vec<SearchResult>, SearchError>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl StaticSearch {
    pub fn with_titles(titles: &[&str]) -> Self {
        let results = titles
            .iter()
            .map(|t| SearchResult {
                title: t.to_string(),
                link: format!("https://example.com/{}", t.replace(' ', "-")),
                snippet: format!("About {t}"),
                source: "Example".to_string(),
            })
            .collect();
        Self {
            results: Ok(results),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            results: Err(SearchError::Transport("connection refused".to_string())),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls().into_iter().map(|(q, _)| q).collect()
    }
}

#[async_trait::async_trait]
impl SearchProvider for StaticSearch {
    fn provider_name(&self) -> &'static str {
        "static"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.lock().unwrap().push((query.to_string(), limit));
        self.results
            .clone()
            .map(|r| r.into_iter().take(limit).collect())
    }
}

pub struct StaticWeather {
    reachable: bool,
    known: Vec<LocationMatch>,
    forecast: Result<RawForecast, WeatherError>,
    location_queries: Mutex<Vec<String>>,
    forecast_calls: Mutex<Vec<(String, u32)>>,
}

impl StaticWeather {
    /// Knows the given places; forecasts fail with the provider's "no match" error.
    pub fn knowing(names: &[&str]) -> Self {
        Self {
            reachable: true,
            known: names.iter().map(|n| location(n)).collect(),
            forecast: Err(WeatherError::Provider {
                code: Some(1006),
                message: "No matching location found.".to_string(),
            }),
            location_queries: Mutex::new(Vec::new()),
            forecast_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_forecast(name: &str, country: &str, days: Vec<ForecastDay>) -> Self {
        let mut out = Self::knowing(&[name]);
        out.forecast = Ok(RawForecast {
            location_name: name.to_string(),
            country: country.to_string(),
            days,
        });
        out
    }

    pub fn unreachable() -> Self {
        let mut out = Self::knowing(&[]);
        out.reachable = false;
        out.forecast = Err(WeatherError::Transport("operation timed out".to_string()));
        out
    }

    pub fn also_knowing(mut self, names: &[&str]) -> Self {
        self.known.extend(names.iter().map(|n| location(n)));
        self
    }

    pub fn forecast_unavailable(mut self) -> Self {
        self.forecast = Err(WeatherError::Transport("operation timed out".to_string()));
        self
    }

    pub fn location_queries(&self) -> Vec<String> {
        self.location_queries.lock().unwrap().clone()
    }

    pub fn forecast_calls(&self) -> Vec<(String, u32)> {
        self.forecast_calls.lock().unwrap().clone()
    }
}

fn location(name: &str) -> LocationMatch {
    LocationMatch {
        name: name.to_string(),
        region: String::new(),
        country: "Testland".to_string(),
        lat: 0.0,
        lon: 0.0,
    }
}

#[async_trait::async_trait]
impl WeatherProvider for StaticWeather {
    fn provider_name(&self) -> &'static str {
        "static"
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<LocationMatch>, WeatherError> {
        self.location_queries.lock().unwrap().push(query.to_string());
        if !self.reachable {
            return Err(WeatherError::Transport("operation timed out".to_string()));
        }
        Ok(self
            .known
            .iter()
            .filter(|l| l.name.eq_ignore_ascii_case(query))
            .cloned()
            .collect())
    }

    async fn forecast(&self, location: &str, days: u32) -> Result<RawForecast, WeatherError> {
        self.forecast_calls
            .lock()
            .unwrap()
            .push((location.to_string(), days));
        let mut forecast = self.forecast.clone()?;
        forecast.days.truncate(days as usize);
        Ok(forecast)
    }
}

enum Failure {
    Message(String),
    Provider(GenerationError),
}

pub struct StaticGenerator {
    reply: Result<String, Failure>,
    prompts: Mutex<Vec<String>>,
}

impl StaticGenerator {
    pub fn replying(text: &str) -> Self {
        Self::with_reply(Ok(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_reply(Err(Failure::Message(message.to_string())))
    }

    /// Fails the way a real client does when the provider answers with an error.
    pub fn rejecting(err: GenerationError) -> Self {
        Self::with_reply(Err(Failure::Provider(err)))
    }

    fn with_reply(reply: Result<String, Failure>) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for StaticGenerator {
    fn provider(&self) -> Provider {
        Provider::Gemini
    }

    async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(Failure::Message(message)) => Err(anyhow::Error::msg(message.clone())),
            Err(Failure::Provider(err)) => Err(err.clone().into()),
        }
    }
}
