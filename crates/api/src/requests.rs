//! Request bodies as they arrive on the wire, and their conversion into
//! validated domain values.
//!
//! Every field is optional at the serde level so a missing field turns into a
//! `missing` entry in the 422 details rather than an opaque decode error.

use crate::error::FieldError;
use chrono::NaiveDate;
use serde::Deserialize;
use tripmate_core::domain::request::{
    normalize_interests, Accommodation, TravelRequest, DEFAULT_BUDGET, DEFAULT_DURATION_DAYS,
};
use tripmate_core::weather::{MAX_FORECAST_DAYS, MIN_FORECAST_DAYS};

const DESTINATION_MIN_CHARS: usize = 2;
const DESTINATION_MAX_CHARS: usize = 100;
const BUDGET_RANGE: (i64, i64) = (100, 50_000);
const DURATION_RANGE: (i64, i64) = (1, 45);
const INTERESTS_RANGE: (usize, usize) = (1, 10);
const DIETARY_MAX_CHARS: usize = 200;

/// Accumulates field errors so a client sees every problem at once.
#[derive(Debug, Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn push(&mut self, err: FieldError) {
        self.errors.push(err);
    }

    fn required_str(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match value {
            Some(v) => Some(v.trim().to_string()),
            None => {
                self.push(FieldError::missing(&["body", field]));
                None
            }
        }
    }

    fn char_len(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let n = value.chars().count();
        if n < min {
            self.push(FieldError::new(
                &["body", field],
                format!("String should have at least {min} characters"),
                "string_too_short",
            ));
        } else if n > max {
            self.push(FieldError::new(
                &["body", field],
                format!("String should have at most {max} characters"),
                "string_too_long",
            ));
        }
    }

    fn int_range(&mut self, field: &str, value: i64, (min, max): (i64, i64)) -> Option<u32> {
        if value < min {
            self.push(FieldError::new(
                &["body", field],
                format!("Input should be greater than or equal to {min}"),
                "greater_than_equal",
            ));
            None
        } else if value > max {
            self.push(FieldError::new(
                &["body", field],
                format!("Input should be less than or equal to {max}"),
                "less_than_equal",
            ));
            None
        } else {
            u32::try_from(value).ok()
        }
    }

    fn finish<T>(self, value: Option<T>) -> Result<T, Vec<FieldError>> {
        match value {
            Some(v) if self.errors.is_empty() => Ok(v),
            _ => Err(self.errors),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ItineraryBody {
    pub source: Option<String>,
    pub destination: Option<String>,
    pub budget: Option<i64>,
    pub duration: Option<i64>,
    pub interests: Option<Vec<String>>,
    pub accommodation: Option<String>,
    pub dietary: Option<String>,
    pub start_date: Option<String>,
    pub weather_preference: Option<String>,
}

impl ItineraryBody {
    pub fn into_request(self) -> Result<TravelRequest, Vec<FieldError>> {
        let mut c = Checker::default();

        let destination = c.required_str("destination", self.destination.as_deref());
        if let Some(d) = &destination {
            c.char_len("destination", d, DESTINATION_MIN_CHARS, DESTINATION_MAX_CHARS);
        }

        let budget = c.int_range("budget", self.budget.unwrap_or(DEFAULT_BUDGET.into()), BUDGET_RANGE);
        let duration = c.int_range(
            "duration",
            self.duration.unwrap_or(DEFAULT_DURATION_DAYS.into()),
            DURATION_RANGE,
        );

        // An omitted list takes the empty default; an explicit list must be 1..=10 long.
        let interests_given = self.interests.is_some();
        let interests = self.interests.unwrap_or_default();
        if interests_given && interests.len() < INTERESTS_RANGE.0 {
            c.push(FieldError::new(
                &["body", "interests"],
                format!("List should have at least {} item after validation", INTERESTS_RANGE.0),
                "too_short",
            ));
        } else if interests.len() > INTERESTS_RANGE.1 {
            c.push(FieldError::new(
                &["body", "interests"],
                format!("List should have at most {} items after validation", INTERESTS_RANGE.1),
                "too_long",
            ));
        }

        let accommodation = match self.accommodation.as_deref() {
            None => Some(Accommodation::default()),
            Some(raw) => match raw.parse::<Accommodation>() {
                Ok(a) => Some(a),
                Err(e) => {
                    c.push(FieldError::new(
                        &["body", "accommodation"],
                        e.to_string(),
                        "string_pattern_mismatch",
                    ));
                    None
                }
            },
        };

        let dietary = self.dietary.unwrap_or_default();
        c.char_len("dietary", &dietary, 0, DIETARY_MAX_CHARS);

        let start_date = match self.start_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(e) => {
                    c.push(FieldError::new(
                        &["body", "start_date"],
                        format!("Input should be a valid date in YYYY-MM-DD format, {e}"),
                        "date_from_datetime_parsing",
                    ));
                    None
                }
            },
        };

        let request = match (destination, budget, duration, accommodation) {
            (Some(destination), Some(budget), Some(duration), Some(accommodation)) => {
                Some(TravelRequest {
                    source: self.source,
                    destination,
                    budget,
                    duration,
                    interests: normalize_interests(&interests),
                    accommodation,
                    dietary,
                    start_date,
                    weather_preference: self.weather_preference,
                })
            }
            _ => None,
        };
        c.finish(request)
    }
}

#[derive(Debug, Deserialize)]
pub struct WeatherBody {
    pub destination: Option<String>,
    pub days: Option<i64>,
}

impl WeatherBody {
    pub fn into_parts(self) -> Result<(String, u32), Vec<FieldError>> {
        let mut c = Checker::default();
        let destination = c.required_str("destination", self.destination.as_deref());
        if let Some(d) = &destination {
            c.char_len("destination", d, DESTINATION_MIN_CHARS, DESTINATION_MAX_CHARS);
        }
        let days = c.int_range(
            "days",
            self.days.unwrap_or(DEFAULT_DURATION_DAYS.into()),
            (MIN_FORECAST_DAYS.into(), MAX_FORECAST_DAYS.into()),
        );
        let parts = destination.zip(days);
        c.finish(parts)
    }
}

#[derive(Debug, Deserialize)]
pub struct TransportBody {
    pub source: Option<String>,
    pub destination: Option<String>,
}

impl TransportBody {
    pub fn into_parts(self) -> Result<(String, String), Vec<FieldError>> {
        let mut c = Checker::default();
        let source = c.required_str("source", self.source.as_deref());
        let destination = c.required_str("destination", self.destination.as_deref());
        for (field, value) in [("source", &source), ("destination", &destination)] {
            if let Some(v) = value {
                c.char_len(field, v, DESTINATION_MIN_CHARS, DESTINATION_MAX_CHARS);
            }
        }
        let parts = source.zip(destination);
        c.finish(parts)
    }
}

#[derive(Debug, Deserialize)]
pub struct LocationBody {
    pub location: Option<String>,
}

impl LocationBody {
    pub fn into_location(self) -> Result<String, Vec<FieldError>> {
        let mut c = Checker::default();
        let location = c.required_str("location", self.location.as_deref());
        c.finish(location)
    }
}
