//! API response types.
//!
//! Request and response bodies of the detection endpoint are the domain
//! types themselves (`LlmOutput` in, `HallucinationEvaluation` out).

use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Human-readable message.
    pub message: String,
}
