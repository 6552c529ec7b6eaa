use crate::error::{domain_error, ApiError};
use crate::extract::{QueryPairs, ValidJson};
use crate::requests::{ItineraryBody, LocationBody, TransportBody, WeatherBody};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use tripmate_core::domain::itinerary::{AssemblyError, LocationRole, WeatherOutcome};
use tripmate_core::domain::request::normalize_interests;
use tripmate_core::itinerary::{transport_query, ItineraryAssembler};
use tripmate_core::search::{search_or_empty, SearchResult, DEFAULT_RESULT_LIMIT};
use tripmate_core::weather::{fetch_summary, WeatherSummary};

pub const SERVICE_NAME: &str = "AI Travel Companion";

const FEATURES: &[&str] = &[
    "Weather-aware itineraries",
    "Location validation",
    "Transportation options",
    "Destination insights",
    "Free-form travel queries",
];

#[derive(Clone)]
pub struct AppState {
    assembler: Option<Arc<ItineraryAssembler>>,
}

impl AppState {
    pub fn new(assembler: Option<Arc<ItineraryAssembler>>) -> Self {
        Self { assembler }
    }

    fn assembler(&self) -> Result<&ItineraryAssembler, ApiError> {
        self.assembler.as_deref().ok_or(ApiError::Unavailable)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/generate_itinerary", post(generate_itinerary))
        .route("/weather_forecast", post(weather_forecast))
        .route("/destination_insights", post(destination_insights))
        .route("/transportation_options", post(transportation_options))
        .route("/validate_location", post(validate_location))
        .route("/travel_query", post(travel_query))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    providers: &'static str,
    features: &'static [&'static str],
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        providers: if state.assembler.is_some() {
            "configured"
        } else {
            "degraded"
        },
        features: FEATURES,
    })
}

#[derive(Debug, Serialize)]
struct ItineraryResponse {
    status: &'static str,
    destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    itinerary: ItinerarySection,
    weather: WeatherOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    transportation: Option<Vec<SearchResult>>,
    metadata: ItineraryMetadata,
}

#[derive(Debug, Serialize)]
struct ItinerarySection {
    ai_generated: String,
    web_context: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
struct ItineraryMetadata {
    budget: u32,
    duration: u32,
    interests: Vec<String>,
    start_date: Option<NaiveDate>,
}

async fn generate_itinerary(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<ItineraryBody>,
) -> Result<Response, ApiError> {
    let request = body.into_request().map_err(ApiError::validation)?;
    let assembler = state.assembler()?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate_itinerary", %request_id, destination = %request.destination);
    let outcome = assembler.assemble(&request).instrument(span).await;

    let result = match outcome {
        Ok(result) => result,
        Err(AssemblyError::Prompt(detail)) => {
            return Err(ApiError::internal(
                "Itinerary generation failed",
                anyhow::anyhow!(detail),
            ));
        }
        Err(err) => {
            tracing::info!(%request_id, error = %err, "itinerary request ended with a domain error");
            return Ok(domain_error(err.message(), err.details()));
        }
    };

    let source = request.source().map(str::to_string);
    let transportation = source.is_some().then_some(result.transport_options);
    Ok(Json(ItineraryResponse {
        status: "success",
        destination: request.destination.clone(),
        source,
        itinerary: ItinerarySection {
            ai_generated: result.ai_generated_itinerary,
            web_context: result.web_search_context,
        },
        weather: result.weather_data,
        transportation,
        metadata: ItineraryMetadata {
            budget: request.budget,
            duration: request.duration,
            interests: request.interests,
            start_date: request.start_date,
        },
    })
    .into_response())
}

#[derive(Debug, Serialize)]
struct WeatherResponse {
    status: &'static str,
    destination: String,
    weather_data: WeatherSummary,
}

async fn weather_forecast(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<WeatherBody>,
) -> Result<Response, ApiError> {
    let (destination, days) = body.into_parts().map_err(ApiError::validation)?;
    let assembler = state.assembler()?;

    match fetch_summary(assembler.weather(), &destination, days).await {
        Ok(weather_data) => Ok(Json(WeatherResponse {
            status: "success",
            destination,
            weather_data,
        })
        .into_response()),
        Err(err) => {
            tracing::warn!(destination = %destination, days, error = %err, "weather forecast failed");
            Ok(domain_error("Weather forecast retrieval failed", err.to_string()))
        }
    }
}

pub fn insights_query(destination: &str, interests: &[String]) -> String {
    let mut query = format!("Best travel guide for {destination} ");
    if !interests.is_empty() {
        query.push_str(&format!("with {}", interests.join(" ")));
    }
    query
}

#[derive(Debug, Serialize)]
struct InsightsResponse {
    status: &'static str,
    destination: String,
    insights: Vec<SearchResult>,
}

async fn destination_insights(
    State(state): State<AppState>,
    query: QueryPairs,
) -> Result<Json<InsightsResponse>, ApiError> {
    let destination = query
        .required("destination")
        .map_err(|e| ApiError::validation(vec![e]))?;
    let interests = normalize_interests(query.all("interests"));
    let assembler = state.assembler()?;

    let insights = search_or_empty(
        assembler.search(),
        &insights_query(&destination, &interests),
        DEFAULT_RESULT_LIMIT,
    )
    .await;

    Ok(Json(InsightsResponse {
        status: "success",
        destination,
        insights,
    }))
}

#[derive(Debug, Serialize)]
struct TransportResponse {
    status: &'static str,
    source: String,
    destination: String,
    transportation_options: Vec<SearchResult>,
}

async fn transportation_options(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<TransportBody>,
) -> Result<Response, ApiError> {
    let (source, destination) = body.into_parts().map_err(ApiError::validation)?;
    let assembler = state.assembler()?;

    for (role, name) in [
        (LocationRole::Destination, destination.as_str()),
        (LocationRole::Source, source.as_str()),
    ] {
        let check = assembler.validator().check(name).await;
        if let Some(reason) = check.reason() {
            tracing::info!(role = role.as_str(), location = name, %reason, "rejecting location");
            return Ok(domain_error(
                format!("Invalid {} location", role.as_str()),
                reason,
            ));
        }
    }

    let transportation_options = search_or_empty(
        assembler.search(),
        &transport_query(&source, &destination),
        DEFAULT_RESULT_LIMIT,
    )
    .await;

    Ok(Json(TransportResponse {
        status: "success",
        source,
        destination,
        transportation_options,
    })
    .into_response())
}

#[derive(Debug, Serialize)]
struct LocationResponse {
    status: &'static str,
    location: String,
    valid: bool,
    reason: Option<String>,
}

async fn validate_location(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<LocationBody>,
) -> Result<Json<LocationResponse>, ApiError> {
    let location = body.into_location().map_err(ApiError::validation)?;
    let assembler = state.assembler()?;

    let check = assembler.validator().check(&location).await;
    let valid = check.is_valid();
    Ok(Json(LocationResponse {
        status: "success",
        location,
        valid,
        reason: check.reason(),
    }))
}

pub fn travel_query_prompt(query: &str) -> String {
    format!("Provide a comprehensive response to the travel query: {query}")
}

#[derive(Debug, Serialize)]
struct QueryResponse {
    status: &'static str,
    query: String,
    response: String,
}

async fn travel_query(
    State(state): State<AppState>,
    params: QueryPairs,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = params
        .required("query")
        .map_err(|e| ApiError::validation(vec![e]))?;
    let assembler = state.assembler()?;

    let response = assembler
        .generator()
        .generate(&travel_query_prompt(&query))
        .await
        .map_err(|e| ApiError::internal("Query processing failed", e))?;

    Ok(Json(QueryResponse {
        status: "success",
        query,
        response,
    }))
}
