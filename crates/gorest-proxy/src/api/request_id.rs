//! Per-request correlation id

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderName;
use axum::http::request::Parts;
use tower_http::request_id::RequestId;
use uuid::Uuid;

/// Header carrying the correlation id on requests and responses
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of the current request
///
/// Taken from the id assigned by the request-id layer, or from the
/// `x-request-id` header. Requests that reach a handler without either get a
/// fresh UUID so failure bodies always carry an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CorrelationId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .extensions
            .get::<RequestId>()
            .and_then(|id| id.header_value().to_str().ok())
            .or_else(|| {
                parts
                    .headers
                    .get(&REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
            })
            .filter(|id| !id.is_empty())
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);
        Ok(Self(id))
    }
}
