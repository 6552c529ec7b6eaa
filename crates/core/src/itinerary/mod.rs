use crate::config::Settings;
use crate::domain::itinerary::{AssemblyError, ItineraryResult, LocationRole, WeatherOutcome};
use crate::domain::request::TravelRequest;
use crate::llm::error::GenerationError;
use crate::llm::TextGenerator;
use crate::search::serpapi::SerpApiClient;
use crate::search::{search_or_empty, SearchProvider};
use crate::weather::weatherapi::WeatherApiClient;
use crate::weather::{fetch_summary, LocationCheck, LocationValidator, WeatherProvider};
use std::sync::Arc;

pub mod prompt;

pub use prompt::ItineraryPrompt;

pub const GUIDE_RESULT_LIMIT: usize = 5;
pub const TRANSPORT_RESULT_LIMIT: usize = 3;

const RAW_OUTPUT_LOG_CHARS: usize = 2000;

pub fn guide_query(destination: &str, interests: &[String]) -> String {
    format!("Best travel guide for {destination} {}", interests.join(" "))
}

pub fn transport_query(source: &str, destination: &str) -> String {
    format!("Transportation options from {source} to {destination}")
}

/// Merges location checks, web search, weather and transport results into one
/// generation request.
///
/// Invalid locations stop the pipeline before any other call. Search and
/// weather failures only degrade the prompt.
#[derive(Clone)]
pub struct ItineraryAssembler {
    search: Arc<dyn SearchProvider>,
    weather: Arc<dyn WeatherProvider>,
    generator: Arc<dyn TextGenerator>,
    validator: LocationValidator,
}

impl ItineraryAssembler {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        weather: Arc<dyn WeatherProvider>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let validator = LocationValidator::new(weather.clone());
        Self {
            search,
            weather,
            generator,
            validator,
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let search = Arc::new(SerpApiClient::from_settings(settings)?);
        let weather = Arc::new(WeatherApiClient::from_settings(settings)?);
        let generator = crate::llm::from_settings(settings)?;
        Ok(Self::new(search, weather, generator))
    }

    pub fn search(&self) -> &dyn SearchProvider {
        self.search.as_ref()
    }

    pub fn weather(&self) -> &dyn WeatherProvider {
        self.weather.as_ref()
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    pub fn validator(&self) -> &LocationValidator {
        &self.validator
    }

    async fn require_location(&self, role: LocationRole, name: &str) -> Result<(), AssemblyError> {
        match self.validator.check(name).await {
            LocationCheck::Found(found) => {
                tracing::debug!(role = role.as_str(), location = name, matched = %found.name, "location ok");
                Ok(())
            }
            check => {
                let reason = check.reason().unwrap_or_default();
                tracing::info!(role = role.as_str(), location = name, %reason, "rejecting location");
                Err(AssemblyError::InvalidLocation {
                    role,
                    location: name.to_string(),
                    reason,
                })
            }
        }
    }

    pub async fn assemble(&self, request: &TravelRequest) -> Result<ItineraryResult, AssemblyError> {
        request
            .validate()
            .map_err(|e| AssemblyError::InvalidRequest(e.to_string()))?;

        let destination = request.destination.trim();
        let source = request.source();

        self.require_location(LocationRole::Destination, destination)
            .await?;
        if let Some(source) = source {
            self.require_location(LocationRole::Source, source).await?;
        }

        let guide_query = guide_query(destination, &request.interests);
        let guide = search_or_empty(self.search.as_ref(), &guide_query, GUIDE_RESULT_LIMIT);
        let transport = async {
            match source {
                Some(source) => {
                    let query = transport_query(source, destination);
                    search_or_empty(self.search.as_ref(), &query, TRANSPORT_RESULT_LIMIT).await
                }
                None => Vec::new(),
            }
        };
        let weather = fetch_summary(self.weather.as_ref(), destination, request.duration);

        let (web_search_context, transport_options, weather) =
            tokio::join!(guide, transport, weather);

        if let Err(err) = &weather {
            tracing::warn!(destination, error = %err, "weather unavailable; generating without it");
        }
        let weather_data = WeatherOutcome::from_result(weather);

        let mut prompt = ItineraryPrompt::new(request)
            .weather(&weather_data)
            .web_results(&web_search_context);
        if source.is_some() {
            prompt = prompt.transport(&transport_options);
        }
        let prompt = prompt
            .render()
            .map_err(|e| AssemblyError::Prompt(e.to_string()))?;

        tracing::info!(
            destination,
            provider = ?self.generator.provider(),
            web_results = web_search_context.len(),
            transport_results = transport_options.len(),
            weather_ok = weather_data.summary().is_some(),
            prompt_chars = prompt.len(),
            "generating itinerary"
        );

        let ai_generated_itinerary = self.generator.generate(&prompt).await.map_err(|err| {
            match err.downcast_ref::<GenerationError>() {
                Some(diag) => {
                    let raw_output = diag.raw_excerpt(RAW_OUTPUT_LOG_CHARS).unwrap_or_default();
                    tracing::error!(
                        destination,
                        provider = ?diag.provider,
                        stage = diag.stage.as_str(),
                        %raw_output,
                        error = %err,
                        "itinerary generation failed"
                    );
                }
                None => {
                    tracing::error!(destination, error = %err, "itinerary generation failed");
                }
            }
            AssemblyError::Generation {
                details: format!("{err:#}"),
            }
        })?;

        Ok(ItineraryResult {
            ai_generated_itinerary,
            web_search_context,
            weather_data,
            transport_options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::request::Accommodation;
    use crate::testing::{forecast_day, StaticGenerator, StaticSearch, StaticWeather};

    fn paris_request() -> TravelRequest {
        TravelRequest {
            source: Some(String::new()),
            destination: "Paris".to_string(),
            budget: 1000,
            duration: 3,
            interests: vec!["Food".to_string()],
            accommodation: Accommodation::Budget,
            dietary: String::new(),
            start_date: None,
            weather_preference: None,
        }
    }

    fn paris_weather() -> StaticWeather {
        StaticWeather::with_forecast(
            "Paris",
            "France",
            vec![
                forecast_day(0, "Light rain", 0.0, -5.0, 8.0),
                forecast_day(1, "Sunny", 22.0, 15.0, 0.0),
                forecast_day(2, "Sunny", 30.0, 25.0, 0.0),
            ],
        )
    }

    fn assembler(
        search: Arc<StaticSearch>,
        weather: Arc<StaticWeather>,
        generator: Arc<StaticGenerator>,
    ) -> ItineraryAssembler {
        ItineraryAssembler::new(search, weather, generator)
    }

    #[tokio::test]
    async fn end_to_end_with_three_day_forecast() {
        let search = Arc::new(StaticSearch::with_titles(&["Paris on a budget"]));
        let weather = Arc::new(paris_weather());
        let generator = Arc::new(StaticGenerator::replying("Day 1: croissants"));

        let result = assembler(search.clone(), weather.clone(), generator.clone())
            .assemble(&paris_request())
            .await
            .unwrap();

        assert_eq!(result.ai_generated_itinerary, "Day 1: croissants");
        assert_eq!(result.web_search_context.len(), 1);
        assert!(result.transport_options.is_empty());

        let summary = result.weather_data.summary().unwrap();
        assert_eq!(summary.daily_forecasts.len(), 3);

        let first = &summary.daily_forecasts[0];
        assert_eq!(first.clothing[0], "Heavy winter coat");
        assert!(first.clothing.contains(&"Waterproof jacket".to_string()));
        assert!(!first.clothing.contains(&"Sunscreen".to_string()));
        assert_eq!(first.recommended_activities[0], "Museum visits");

        let third = &summary.daily_forecasts[2];
        assert!(third.clothing.contains(&"Sunscreen".to_string()));
        assert!(third.clothing.contains(&"Sun hat".to_string()));
        assert!(third
            .recommended_activities
            .contains(&"Beach activities".to_string()));

        // blank source: one search only, no transport section
        assert_eq!(
            search.calls(),
            vec![("Best travel guide for Paris Food".to_string(), GUIDE_RESULT_LIMIT)]
        );
        let prompt = &generator.prompts()[0];
        assert!(prompt.contains("Mostly Sunny with some Light rain"));
        assert!(!prompt.contains("Transportation Options"));
    }

    #[tokio::test]
    async fn invalid_destination_short_circuits() {
        let search = Arc::new(StaticSearch::with_titles(&["x"]));
        let weather = Arc::new(StaticWeather::knowing(&["Lyon"]));
        let generator = Arc::new(StaticGenerator::replying("unused"));

        let err = assembler(search.clone(), weather.clone(), generator.clone())
            .assemble(&paris_request())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AssemblyError::InvalidLocation {
                role: LocationRole::Destination,
                ..
            }
        ));
        assert!(search.calls().is_empty());
        assert!(weather.forecast_calls().is_empty());
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn invalid_source_short_circuits_after_destination() {
        let search = Arc::new(StaticSearch::with_titles(&["x"]));
        let weather = Arc::new(paris_weather());
        let generator = Arc::new(StaticGenerator::replying("unused"));

        let mut request = paris_request();
        request.source = Some("Atlantis".to_string());

        let err = assembler(search.clone(), weather.clone(), generator.clone())
            .assemble(&request)
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Invalid source location");
        assert_eq!(
            weather.location_queries(),
            vec!["Paris".to_string(), "Atlantis".to_string()]
        );
        assert!(search.calls().is_empty());
        assert!(generator.prompts().is_empty());
    }

    #[tokio::test]
    async fn source_adds_transport_search_and_prompt_section() {
        let search = Arc::new(StaticSearch::with_titles(&["route"]));
        let weather = Arc::new(paris_weather().also_knowing(&["Lyon"]));
        let generator = Arc::new(StaticGenerator::replying("ok"));

        let mut request = paris_request();
        request.source = Some("Lyon".to_string());

        let result = assembler(search.clone(), weather, generator.clone())
            .assemble(&request)
            .await
            .unwrap();

        assert_eq!(result.transport_options.len(), 1);
        let mut calls = search.calls();
        calls.sort();
        assert_eq!(
            calls,
            vec![
                ("Best travel guide for Paris Food".to_string(), GUIDE_RESULT_LIMIT),
                (
                    "Transportation options from Lyon to Paris".to_string(),
                    TRANSPORT_RESULT_LIMIT
                ),
            ]
        );
        assert!(generator.prompts()[0].contains("Transportation Options:"));
    }

    #[tokio::test]
    async fn weather_failure_is_not_fatal() {
        let search = Arc::new(StaticSearch::failing());
        let weather = Arc::new(StaticWeather::knowing(&["Paris"]).forecast_unavailable());
        let generator = Arc::new(StaticGenerator::replying("indoor plan"));

        let result = assembler(search, weather, generator.clone())
            .assemble(&paris_request())
            .await
            .unwrap();

        assert_eq!(result.ai_generated_itinerary, "indoor plan");
        assert!(result.web_search_context.is_empty());
        assert!(matches!(result.weather_data, WeatherOutcome::Failed { .. }));
        assert!(generator.prompts()[0].contains("Weather data unavailable"));
    }

    #[tokio::test]
    async fn generator_failure_has_its_own_error_shape() {
        let search = Arc::new(StaticSearch::with_titles(&["x"]));
        let weather = Arc::new(paris_weather());
        let generator = Arc::new(StaticGenerator::failing("quota exceeded"));

        let err = assembler(search, weather, generator)
            .assemble(&paris_request())
            .await
            .unwrap_err();

        match err {
            AssemblyError::Generation { details } => assert!(details.contains("quota exceeded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn provider_error_message_reaches_generation_details() {
        let search = Arc::new(StaticSearch::with_titles(&["x"]));
        let weather = Arc::new(paris_weather());
        let generator = Arc::new(StaticGenerator::rejecting(GenerationError::http(
            crate::llm::Provider::Gemini,
            reqwest::StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"code": 429, "message": "Resource has been exhausted"}}"#.to_string(),
        )));

        let err = assembler(search, weather, generator)
            .assemble(&paris_request())
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Itinerary generation failed");
        assert!(err.details().contains("stage=http"));
        assert!(err.details().contains("Resource has been exhausted"));
    }

    #[test]
    fn query_wording() {
        assert_eq!(
            guide_query("Rome", &["History".to_string(), "Food".to_string()]),
            "Best travel guide for Rome History Food"
        );
        assert_eq!(
            transport_query("Milan", "Rome"),
            "Transportation options from Milan to Rome"
        );
    }
}
