use anyhow::ensure;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BUDGET: u32 = 3000;
pub const DEFAULT_DURATION_DAYS: u32 = 5;
pub const DEFAULT_DIETARY: &str = "No restrictions";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Accommodation {
    #[default]
    Budget,
    #[serde(rename = "Mid-range")]
    MidRange,
    Luxury,
    Hostel,
    Airbnb,
}

impl Accommodation {
    pub const ALL: [Accommodation; 5] = [
        Accommodation::Budget,
        Accommodation::MidRange,
        Accommodation::Luxury,
        Accommodation::Hostel,
        Accommodation::Airbnb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Accommodation::Budget => "Budget",
            Accommodation::MidRange => "Mid-range",
            Accommodation::Luxury => "Luxury",
            Accommodation::Hostel => "Hostel",
            Accommodation::Airbnb => "Airbnb",
        }
    }
}

impl fmt::Display for Accommodation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Accommodation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Accommodation::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Accommodation::ALL.iter().map(|a| a.as_str()).collect();
                anyhow::anyhow!("accommodation must be one of {} (got {s:?})", allowed.join(", "))
            })
    }
}

/// One traveller's trip parameters, already normalized by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TravelRequest {
    pub source: Option<String>,
    pub destination: String,
    pub budget: u32,
    pub duration: u32,
    pub interests: Vec<String>,
    pub accommodation: Accommodation,
    pub dietary: String,
    pub start_date: Option<NaiveDate>,
    pub weather_preference: Option<String>,
}

impl TravelRequest {
    pub fn new(destination: impl Into<String>, duration: u32) -> anyhow::Result<Self> {
        let request = Self {
            source: None,
            destination: destination.into(),
            budget: DEFAULT_BUDGET,
            duration,
            interests: Vec::new(),
            accommodation: Accommodation::default(),
            dietary: String::new(),
            start_date: None,
            weather_preference: None,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.destination.trim().is_empty(),
            "destination must be non-empty"
        );
        ensure!(
            self.duration >= 1,
            "duration must be at least 1 day (got {})",
            self.duration
        );
        Ok(())
    }

    /// The origin, if one was actually given. Blank strings count as absent.
    pub fn source(&self) -> Option<&str> {
        self.source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn dietary_or_default(&self) -> &str {
        let dietary = self.dietary.trim();
        if dietary.is_empty() {
            DEFAULT_DIETARY
        } else {
            dietary
        }
    }
}

/// Trims and capitalizes an interest: first character upper-case, the rest lower-case.
pub fn normalize_interest(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn normalize_interests<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| normalize_interest(s.as_ref()))
        .collect()
}
