use crate::search::SearchResult;
use crate::weather::{WeatherError, WeatherSummary};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

pub const WEATHER_FETCH_FAILED: &str = "Failed to fetch weather data";

/// Weather section of a result: a summary, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeatherOutcome {
    Summary(WeatherSummary),
    Failed { error: String, details: String },
}

impl WeatherOutcome {
    pub fn from_result(result: Result<WeatherSummary, WeatherError>) -> Self {
        match result {
            Ok(summary) => WeatherOutcome::Summary(summary),
            Err(err) => WeatherOutcome::Failed {
                error: WEATHER_FETCH_FAILED.to_string(),
                details: err.to_string(),
            },
        }
    }

    pub fn summary(&self) -> Option<&WeatherSummary> {
        match self {
            WeatherOutcome::Summary(summary) => Some(summary),
            WeatherOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItineraryResult {
    pub ai_generated_itinerary: String,
    pub web_search_context: Vec<SearchResult>,
    pub weather_data: WeatherOutcome,
    pub transport_options: Vec<SearchResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationRole {
    Destination,
    Source,
}

impl LocationRole {
    pub fn as_str(self) -> &'static str {
        match self {
            LocationRole::Destination => "destination",
            LocationRole::Source => "source",
        }
    }
}

/// Why an itinerary could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AssemblyError {
    InvalidRequest(String),
    InvalidLocation {
        role: LocationRole,
        location: String,
        reason: String,
    },
    Generation {
        details: String,
    },
    Prompt(String),
}

impl AssemblyError {
    pub fn message(&self) -> String {
        match self {
            AssemblyError::InvalidRequest(_) => "Invalid travel request".to_string(),
            AssemblyError::InvalidLocation { role, .. } => {
                format!("Invalid {} location", role.as_str())
            }
            AssemblyError::Generation { .. } | AssemblyError::Prompt(_) => {
                "Itinerary generation failed".to_string()
            }
        }
    }

    pub fn details(&self) -> String {
        match self {
            AssemblyError::InvalidRequest(detail) | AssemblyError::Prompt(detail) => detail.clone(),
            AssemblyError::InvalidLocation { reason, .. } => reason.clone(),
            AssemblyError::Generation { details } => details.clone(),
        }
    }
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message(), self.details())
    }
}

impl std::error::Error for AssemblyError {}

/// Renders as `{"error": .., "details": ..}`.
impl Serialize for AssemblyError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("AssemblyError", 2)?;
        s.serialize_field("error", &self.message())?;
        s.serialize_field("details", &self.details())?;
        s.end()
    }
}
