//! Nicotine - AI Hallucination Detection Service
//!
//! Forwards prompt/response pairs to an upstream LLM in structured-output
//! mode and relays back a judgment of whether the response hallucinates.

use std::sync::Arc;

use tokio::net::TcpListener;

mod api;
mod config;
mod detection;
mod domain;
mod error;
mod logging;

use crate::api::build_router;
use crate::config::Config;
use crate::detection::{Detector, HallucinationDetector, OpenAiJudge};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The hallucination detector.
    pub detector: Arc<dyn Detector>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting Nicotine v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration; refuses to start without an upstream credential
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        upstream = %config.openai.base_url,
        "Configuration loaded"
    );

    // One upstream client handle for the process lifetime
    let judge = Arc::new(OpenAiJudge::new(config.openai.clone())?);
    let detector: Arc<dyn Detector> = Arc::new(HallucinationDetector::new(judge));

    let state = AppState { detector };
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
