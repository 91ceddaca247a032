//! Error types for Nicotine.
//!
//! Defines a unified error type that maps cleanly to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for the HTTP layer.
///
/// Upstream failures never reach this type: the detector normalizes them
/// into evaluation data. Only failures outside that guarded contract become
/// HTTP error responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Error processing hallucination detection: {0}.")]
    Detection(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, detail) = match &self {
            ApiError::Detection(msg) => {
                tracing::error!(error = %msg, "Error processing request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Detection Error".to_string(),
                    self.to_string(),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        let body = ErrorResponse { error, detail };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handler operations.
pub type ApiResult<T> = Result<T, ApiError>;
