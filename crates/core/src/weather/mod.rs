use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod summary;
pub mod validator;
pub mod weatherapi;

pub use summary::{summarize, DailyRecommendation, WeatherSummary};
pub use validator::{LocationCheck, LocationValidator};

pub const MIN_FORECAST_DAYS: u32 = 1;
pub const MAX_FORECAST_DAYS: u32 = 10;

/// A place the weather provider's location search knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMatch {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

/// One calendar day as the provider reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub condition: String,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub precip_mm: f64,
}

impl ForecastDay {
    pub fn mid_temp_c(&self) -> f64 {
        (self.max_temp_c + self.min_temp_c) / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawForecast {
    pub location_name: String,
    pub country: String,
    pub days: Vec<ForecastDay>,
}

#[derive(Debug, Clone)]
pub enum WeatherError {
    Transport(String),
    Http { status: u16, body: String },
    /// The payload itself carried an error object.
    Provider { code: Option<i64>, message: String },
    Decode(String),
    EmptyForecast,
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::Transport(detail) => write!(f, "weather request failed: {detail}"),
            WeatherError::Http { status, body } => write!(f, "weather HTTP {status}: {body}"),
            WeatherError::Provider { code: Some(code), message } => {
                write!(f, "weather provider error {code}: {message}")
            }
            WeatherError::Provider { code: None, message } => {
                write!(f, "weather provider error: {message}")
            }
            WeatherError::Decode(detail) => {
                write!(f, "weather response could not be decoded: {detail}")
            }
            WeatherError::EmptyForecast => f.write_str("weather provider returned no forecast days"),
        }
    }
}

impl std::error::Error for WeatherError {}

#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn search_locations(&self, query: &str) -> Result<Vec<LocationMatch>, WeatherError>;

    /// `days` is clamped to the provider window before the call is made.
    async fn forecast(&self, location: &str, days: u32) -> Result<RawForecast, WeatherError>;
}

pub fn clamp_forecast_days(days: u32) -> u32 {
    days.clamp(MIN_FORECAST_DAYS, MAX_FORECAST_DAYS)
}

/// Fetches a forecast for `destination` and turns it into per-day recommendations.
///
/// A failed provider call yields an error, never a partial summary. A forecast
/// shorter than `duration` is truncated silently.
pub async fn fetch_summary(
    provider: &dyn WeatherProvider,
    destination: &str,
    duration: u32,
) -> Result<WeatherSummary, WeatherError> {
    let forecast = provider
        .forecast(destination, clamp_forecast_days(duration))
        .await?;
    summarize(&forecast, duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{forecast_day, StaticWeather};

    #[test]
    fn clamps_requested_days_to_provider_window() {
        assert_eq!(clamp_forecast_days(0), 1);
        assert_eq!(clamp_forecast_days(5), 5);
        assert_eq!(clamp_forecast_days(45), 10);
    }

    #[tokio::test]
    async fn asks_for_clamped_days_and_truncates_to_what_came_back() {
        let weather = StaticWeather::with_forecast(
            "Paris",
            "France",
            (0..5)
                .map(|i| forecast_day(i, "Sunny", 22.0, 14.0, 0.0))
                .collect(),
        );

        let summary = fetch_summary(&weather, "Paris", 30).await.unwrap();
        assert_eq!(summary.forecast_days, 5);
        assert_eq!(summary.daily_forecasts.len(), 5);
        assert_eq!(weather.forecast_calls(), vec![("Paris".to_string(), 10)]);
    }

    #[tokio::test]
    async fn provider_failure_is_an_error_not_a_partial_summary() {
        let weather = StaticWeather::unreachable();
        let err = fetch_summary(&weather, "Paris", 3).await.unwrap_err();
        assert!(matches!(err, WeatherError::Transport(_)));
    }
}
