//! HTTP request handlers.

use axum::{extract::State, Json};

use crate::api::types::HealthResponse;
use crate::domain::{HallucinationEvaluation, LlmOutput};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Root endpoint providing basic service information.
///
/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Nicotine AI Hallucination Detection Service.".to_string(),
    })
}

/// Health check endpoint for monitoring.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Service is running.".to_string(),
    })
}

/// Detect hallucinations in an LLM output.
///
/// POST /api/v1/detect-hallucination
///
/// Upstream failures do not surface here: the detector returns a
/// conservative default evaluation carrying `error` instead. The error
/// branch below guards other `Detector` implementations.
#[utoipa::path(
    post,
    path = "/api/v1/detect-hallucination",
    request_body = LlmOutput,
    responses(
        (status = 200, description = "Evaluation complete", body = HallucinationEvaluation),
        (status = 422, description = "Invalid request body"),
        (status = 500, description = "Internal error")
    ),
    tag = "detection"
)]
pub async fn detect_hallucination(
    State(state): State<AppState>,
    Json(llm_output): Json<LlmOutput>,
) -> ApiResult<Json<HallucinationEvaluation>> {
    tracing::info!(
        id = %llm_output.id,
        model = %llm_output.settings.model,
        "Processing hallucination detection"
    );

    let evaluation = state
        .detector
        .detect(&llm_output)
        .await
        .map_err(|e| ApiError::Detection(e.to_string()))?;

    tracing::info!(
        id = %llm_output.id,
        is_hallucination = evaluation.is_hallucination,
        upstream_error = evaluation.error.is_some(),
        "Completed analysis"
    );

    Ok(Json(evaluation))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::api::build_router;
    use crate::detection::Detector;
    use crate::domain::{HallucinationEvaluation, LlmOutput};
    use crate::AppState;

    struct MockDetector {
        evaluation: HallucinationEvaluation,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Detector for MockDetector {
        async fn detect(&self, _output: &LlmOutput) -> anyhow::Result<HallucinationEvaluation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.evaluation.clone())
        }
    }

    struct FailingDetector;

    #[async_trait]
    impl Detector for FailingDetector {
        async fn detect(&self, _output: &LlmOutput) -> anyhow::Result<HallucinationEvaluation> {
            Err(anyhow::anyhow!("detector exploded"))
        }
    }

    fn correct_answer_evaluation() -> HallucinationEvaluation {
        HallucinationEvaluation {
            is_hallucination: false,
            rationale: "Correct answer.".to_string(),
            delusion_percentage: 0.0,
            error: None,
        }
    }

    fn app_with(detector: Arc<dyn Detector>) -> axum::Router {
        build_router(AppState { detector })
    }

    fn detect_request(body: Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/detect-hallucination")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn capital_of_france_payload() -> Value {
        json!({
            "id": "1",
            "prompt": "What is the capital of France?",
            "output": "Paris",
            "settings": {"model": "gpt-4o", "temperature": 0.0, "max_tokens": 1000}
        })
    }

    #[tokio::test]
    async fn test_root_returns_service_banner() {
        let app = app_with(Arc::new(FailingDetector));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(
            body["message"],
            "Nicotine AI Hallucination Detection Service."
        );
    }

    #[tokio::test]
    async fn test_health_check_returns_constant_payload() {
        let app = app_with(Arc::new(FailingDetector));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], "Service is running.");
    }

    #[tokio::test]
    async fn test_detect_returns_evaluation_verbatim() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app_with(Arc::new(MockDetector {
            evaluation: correct_answer_evaluation(),
            calls: calls.clone(),
        }));

        let response = app.oneshot(detect_request(capital_of_france_payload())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "is_hallucination": false,
                "rationale": "Correct answer.",
                "delusion_percentage": 0.0,
                "error": null
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_detect_rejects_missing_field_without_invoking_detector() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app_with(Arc::new(MockDetector {
            evaluation: correct_answer_evaluation(),
            calls: calls.clone(),
        }));

        // Missing the required "output" field
        let payload = json!({
            "id": "1",
            "prompt": "What is the capital of France?",
            "settings": {"model": "gpt-4o", "temperature": 0.0, "max_tokens": 1000}
        });
        let response = app.oneshot(detect_request(payload)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_detect_rejects_mistyped_field() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app_with(Arc::new(MockDetector {
            evaluation: correct_answer_evaluation(),
            calls: calls.clone(),
        }));

        let payload = json!({
            "id": "1",
            "prompt": "What is the capital of France?",
            "output": "Paris",
            "settings": {"model": "gpt-4o", "temperature": "hot", "max_tokens": 1000}
        });
        let response = app.oneshot(detect_request(payload)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_detector_failure_maps_to_server_error() {
        let app = app_with(Arc::new(FailingDetector));
        let response = app.oneshot(detect_request(capital_of_france_payload())).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Error processing hallucination detection:"));
        assert!(detail.contains("detector exploded"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_detect_requests_all_succeed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = app_with(Arc::new(MockDetector {
            evaluation: correct_answer_evaluation(),
            calls: calls.clone(),
        }));

        let mut tasks = Vec::new();
        for _ in 0..10 {
            let app = app.clone();
            tasks.push(tokio::spawn(async move {
                app.oneshot(detect_request(capital_of_france_payload()))
                    .await
                    .unwrap()
                    .status()
            }));
        }

        for task in tasks {
            assert_eq!(task.await.unwrap(), StatusCode::OK);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }
}
