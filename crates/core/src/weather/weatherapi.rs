use crate::config::{env_or, env_u64, Settings};
use crate::weather::{
    clamp_forecast_days, ForecastDay, LocationMatch, RawForecast, WeatherError, WeatherProvider,
};
use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Client for WeatherAPI.com (`search.json` and `forecast.json`).
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherApiClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_weather_api_key()?.to_string();
        let base_url = env_or("WEATHER_API_BASE_URL", DEFAULT_BASE_URL);
        let timeout_secs = env_u64("WEATHER_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build weather http client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url.trim_end_matches('/'))
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, WeatherError> {
        let res = self
            .http
            .get(self.url(endpoint))
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| WeatherError::Transport(e.to_string()))?;

        // WeatherAPI reports bad keys and unknown places as a 4xx with an `error` object.
        let raw = serde_json::from_str::<Value>(&text);
        if let Ok(raw) = &raw {
            check_error_marker(raw)?;
        }
        if !status.is_success() {
            return Err(WeatherError::Http {
                status: status.as_u16(),
                body: text,
            });
        }
        raw.map_err(|e| WeatherError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl WeatherProvider for WeatherApiClient {
    fn provider_name(&self) -> &'static str {
        "weatherapi"
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<LocationMatch>, WeatherError> {
        let raw = self.get_json("search.json", &[("q", query)]).await?;
        serde_json::from_value::<Vec<LocationMatch>>(raw)
            .map_err(|e| WeatherError::Decode(e.to_string()))
    }

    async fn forecast(&self, location: &str, days: u32) -> Result<RawForecast, WeatherError> {
        let days = clamp_forecast_days(days).to_string();
        let raw = self
            .get_json(
                "forecast.json",
                &[
                    ("q", location),
                    ("days", days.as_str()),
                    ("aqi", "no"),
                    ("alerts", "yes"),
                ],
            )
            .await?;
        parse_forecast(raw)
    }
}

fn check_error_marker(raw: &Value) -> Result<(), WeatherError> {
    let Some(error) = raw.get("error") else {
        return Ok(());
    };

    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string());

    Err(WeatherError::Provider {
        code: error.get("code").and_then(Value::as_i64),
        message,
    })
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    location: ApiLocation,
    forecast: ApiForecast,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ApiForecast {
    #[serde(default)]
    forecastday: Vec<ApiForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ApiForecastDay {
    date: NaiveDate,
    day: ApiDay,
}

#[derive(Debug, Deserialize)]
struct ApiDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    #[serde(default)]
    totalprecip_mm: f64,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
}

fn parse_forecast(raw: Value) -> Result<RawForecast, WeatherError> {
    check_error_marker(&raw)?;
    let parsed = serde_json::from_value::<ForecastResponse>(raw)
        .map_err(|e| WeatherError::Decode(e.to_string()))?;

    let days = parsed
        .forecast
        .forecastday
        .into_iter()
        .map(|d| ForecastDay {
            date: d.date,
            condition: d.day.condition.text.trim().to_string(),
            max_temp_c: d.day.maxtemp_c,
            min_temp_c: d.day.mintemp_c,
            precip_mm: d.day.totalprecip_mm,
        })
        .collect();

    Ok(RawForecast {
        location_name: parsed.location.name,
        country: parsed.location.country,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_forecast_days() {
        let raw = json!({
            "location": {"name": "Paris", "region": "Ile-de-France", "country": "France"},
            "current": {"temp_c": 12.0},
            "forecast": {
                "forecastday": [
                    {
                        "date": "2026-05-01",
                        "day": {
                            "maxtemp_c": 21.3,
                            "mintemp_c": 11.0,
                            "totalprecip_mm": 0.4,
                            "condition": {"text": "Partly cloudy ", "code": 1003}
                        },
                        "hour": []
                    }
                ]
            }
        });

        let forecast = parse_forecast(raw).unwrap();
        assert_eq!(forecast.location_name, "Paris");
        assert_eq!(forecast.country, "France");
        assert_eq!(forecast.days.len(), 1);
        assert_eq!(forecast.days[0].condition, "Partly cloudy");
        assert_eq!(forecast.days[0].date, NaiveDate::from_ymd_opt(2026, 5, 1).unwrap());
        assert_eq!(forecast.days[0].precip_mm, 0.4);
    }

    #[test]
    fn error_marker_in_payload_is_a_provider_error() {
        let raw = json!({"error": {"code": 1006, "message": "No matching location found."}});
        let err = parse_forecast(raw).unwrap_err();
        match err {
            WeatherError::Provider { code, message } => {
                assert_eq!(code, Some(1006));
                assert_eq!(message, "No matching location found.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn location_search_shape() {
        let raw = json!([
            {"id": 2801268, "name": "Paris", "region": "Ile-de-France", "country": "France",
             "lat": 48.87, "lon": 2.33, "url": "paris-ile-de-france-france"}
        ]);
        let matches: Vec<LocationMatch> = serde_json::from_value(raw).unwrap();
        assert_eq!(matches[0].name, "Paris");
        assert_eq!(matches[0].country, "France");
    }
}
