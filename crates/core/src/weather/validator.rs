use crate::weather::{LocationMatch, WeatherProvider};
use std::sync::Arc;

/// Outcome of asking the weather provider whether a place exists.
///
/// Both `NotFound` and `Unavailable` reject the location; they are kept apart
/// so callers can tell "no such place" from "could not ask".
#[derive(Debug, Clone, PartialEq)]
pub enum LocationCheck {
    Found(LocationMatch),
    NotFound { query: String },
    Unavailable { detail: String },
}

impl LocationCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, LocationCheck::Found(_))
    }

    pub fn reason(&self) -> Option<String> {
        match self {
            LocationCheck::Found(_) => None,
            LocationCheck::NotFound { query } => Some(format!("Location '{query}' not found")),
            LocationCheck::Unavailable { detail } => {
                Some(format!("Location validation failed: {detail}"))
            }
        }
    }
}

#[derive(Clone)]
pub struct LocationValidator {
    provider: Arc<dyn WeatherProvider>,
}

impl LocationValidator {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub async fn check(&self, name: &str) -> LocationCheck {
        let query = name.trim();
        if query.is_empty() {
            return LocationCheck::NotFound {
                query: name.to_string(),
            };
        }

        match self.provider.search_locations(query).await {
            Ok(matches) => match matches.into_iter().next() {
                Some(best) => LocationCheck::Found(best),
                None => LocationCheck::NotFound {
                    query: query.to_string(),
                },
            },
            Err(err) => {
                tracing::warn!(
                    provider = self.provider.provider_name(),
                    location = query,
                    error = %err,
                    "location lookup failed; treating location as invalid"
                );
                LocationCheck::Unavailable {
                    detail: err.to_string(),
                }
            }
        }
    }

    /// Fails closed: provider errors reject the location just like an empty match list.
    pub async fn validate(&self, name: &str) -> bool {
        self.check(name).await.is_valid()
    }
}
