//! Route definitions for the API.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as CorsAny, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::error::ErrorResponse;
use crate::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::root,
        handlers::health_check,
        handlers::detect_hallucination,
    ),
    components(schemas(
        crate::api::types::HealthResponse,
        crate::domain::LlmSettings,
        crate::domain::LlmInput,
        crate::domain::LlmOutput,
        crate::domain::HallucinationEvaluation,
    )),
    tags(
        (name = "detection", description = "Hallucination detection endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Nicotine API",
        version = "1.0.0",
        description = "AI Hallucination Detection Service",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Catch-all for anything that escapes the handlers. Fixed generic body,
/// independent of the triggering endpoint.
fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Unhandled panic while serving request");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal Server Error".to_string(),
            detail: "An unexpected error occurred.".to_string(),
        }),
    )
        .into_response()
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(CorsAny)
        .allow_methods(CorsAny)
        .allow_headers(CorsAny);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/api/v1/detect-hallucination",
            post(handlers::detect_hallucination),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}
