use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// One field-level validation failure, in the `{loc, msg, type}` shape clients already parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl FieldError {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: &'static str) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind,
        }
    }

    pub fn missing(loc: &[&str]) -> Self {
        Self::new(loc, "Field required", "missing")
    }
}

/// `{status: "error", message, details}`. Domain failures go out with HTTP 200 in this shape.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<D: Serialize> {
    pub status: &'static str,
    pub message: String,
    pub details: D,
}

impl<D: Serialize> ErrorEnvelope<D> {
    pub fn new(message: impl Into<String>, details: D) -> Self {
        Self {
            status: "error",
            message: message.into(),
            details,
        }
    }
}

pub fn domain_error(message: impl Into<String>, details: impl Into<String>) -> Response {
    Json(ErrorEnvelope::new(message, details.into())).into_response()
}

#[derive(Debug)]
pub enum ApiError {
    /// 422 with field-level details.
    Validation(Vec<FieldError>),
    /// 500 wrapped in `{"detail": ..}`.
    Internal { message: &'static str, details: String },
    /// 503: the process started without its provider clients.
    Unavailable,
}

impl ApiError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        ApiError::Validation(errors)
    }

    /// Reports the failure to Sentry and the log before it is rendered.
    pub fn internal(message: &'static str, err: anyhow::Error) -> Self {
        sentry_anyhow::capture_anyhow(&err);
        tracing::error!(error = %err, "{message}");
        ApiError::Internal {
            message,
            details: format!("{err:#}"),
        }
    }
}

#[derive(Serialize)]
struct DetailWrapper<D: Serialize> {
    detail: ErrorEnvelope<D>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorEnvelope::new("Validation Error", errors)),
            )
                .into_response(),
            ApiError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DetailWrapper {
                    detail: ErrorEnvelope::new(message, details),
                }),
            )
                .into_response(),
            ApiError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(DetailWrapper {
                    detail: ErrorEnvelope::new(
                        "Service unavailable",
                        "provider clients are not configured".to_string(),
                    ),
                }),
            )
                .into_response(),
        }
    }
}
