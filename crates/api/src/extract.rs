use crate::error::{ApiError, FieldError};
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

/// `Json<T>` whose rejections render as 422 validation envelopes instead of axum's plain text.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::validation(vec![FieldError::new(&["body"], e.body_text(), "body_read")])
        })?;
        if bytes.is_empty() {
            return Err(ApiError::validation(vec![FieldError::missing(&["body"])]));
        }
        serde_json::from_slice(&bytes)
            .map(ValidJson)
            .map_err(|e| ApiError::validation(vec![decode_error(&e)]))
    }
}

fn decode_error(err: &serde_json::Error) -> FieldError {
    use serde_json::error::Category;
    let kind = match err.classify() {
        Category::Data => "type_error",
        Category::Syntax | Category::Eof | Category::Io => "json_invalid",
    };
    FieldError::new(&["body"], err.to_string(), kind)
}

/// Decoded `?key=value` pairs in order. Repeated keys are kept.
#[derive(Debug, Default)]
pub struct QueryPairs(Vec<(String, String)>);

impl QueryPairs {
    pub fn parse(raw: &str) -> Self {
        QueryPairs(url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect())
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// A required, non-blank parameter, or the 422 detail for it.
    pub fn required(&self, key: &str) -> Result<String, FieldError> {
        match self.first(key).map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(FieldError::missing(&["query", key])),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for QueryPairs
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.uri.query().map(QueryPairs::parse).unwrap_or_default())
    }
}
