//! API error types
//!
//! Every failure leaves the proxy as a [`FailureEnvelope`] carrying the
//! request's correlation id.

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gorest_api::FailureEnvelope;
use gorest_client::ClientError;

use crate::api::request_id::CorrelationId;

/// Failure of a proxy request
#[derive(Debug)]
pub enum AppError {
    /// Caller-submitted path, query or body failed validation (400)
    Validation {
        request_id: String,
        message: &'static str,
        errors: Vec<String>,
    },
    /// The upstream call failed (500)
    Client {
        request_id: String,
        message: &'static str,
        source: ClientError,
    },
}

impl AppError {
    /// Validation failure with per-field messages
    pub fn validation(
        request_id: &CorrelationId,
        message: &'static str,
        errors: Vec<String>,
    ) -> Self {
        Self::Validation {
            request_id: request_id.0.clone(),
            message,
            errors,
        }
    }

    /// Validation failure from an extractor rejection
    pub fn rejection(
        request_id: &CorrelationId,
        message: &'static str,
        rejection: impl fmt::Display,
    ) -> Self {
        Self::validation(request_id, message, vec![rejection.to_string()])
    }

    /// Adapter for `map_err` on client results
    ///
    /// ```ignore
    /// let user = directory
    ///     .get_user(id)
    ///     .await
    ///     .map_err(AppError::client(&request_id, "Failed to fetch user"))?;
    /// ```
    pub fn client(
        request_id: &CorrelationId,
        message: &'static str,
    ) -> impl FnOnce(ClientError) -> Self + use<> {
        let request_id = request_id.0.clone();
        move |source| Self::Client {
            request_id,
            message,
            source,
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Client { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = match self {
            AppError::Validation {
                request_id,
                message,
                errors,
            } => {
                tracing::warn!(%request_id, ?errors, "{message}");
                FailureEnvelope {
                    success: false,
                    message: message.to_string(),
                    error: None,
                    errors,
                    request_id,
                }
            }
            AppError::Client {
                request_id,
                message,
                source,
            } => {
                tracing::error!(
                    %request_id,
                    upstream_status = source.upstream_status(),
                    error = %source,
                    "{message}"
                );
                FailureEnvelope {
                    success: false,
                    message: message.to_string(),
                    error: Some(source.to_string()),
                    errors: Vec::new(),
                    request_id,
                }
            }
        };
        (status, Json(envelope)).into_response()
    }
}
