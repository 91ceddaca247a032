//! Schema-guided evaluation via the OpenAI Responses API.
//!
//! The judge asks the upstream model for output constrained to the
//! `HallucinationEvaluation` shape (strict JSON schema). One long-lived
//! client handle is shared for the process lifetime.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::OpenAiConfig;
use crate::detection::detector::StructuredJudge;
use crate::domain::{HallucinationEvaluation, LlmSettings};

/// Failure modes of the upstream call. Undifferentiated for the caller:
/// the detector stringifies whichever variant occurs.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode structured output: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Request body for the Responses API.
#[derive(Debug, Serialize)]
struct ResponsesRequest {
    model: String,
    input: String,
    stream: bool,
    temperature: f64,
    max_output_tokens: u32,
    text: Value,
}

/// Response body from the Responses API (only the fields we read).
#[derive(Debug, Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

impl ResponsesResponse {
    /// Extract the first message item's output text, if any.
    fn output_text(&self) -> Option<&str> {
        self.output
            .iter()
            .filter(|item| item.kind == "message")
            .flat_map(|item| item.content.iter())
            .find(|part| part.kind == "output_text" && !part.text.is_empty())
            .map(|part| part.text.as_str())
    }
}

/// JSON schema the upstream model is constrained to.
///
/// The instruction itself does not define the field semantics; the
/// descriptions here are what the model sees, so they carry that weight.
fn evaluation_schema() -> Value {
    json!({
        "type": "object",
        "required": ["is_hallucination", "rationale", "delusion_percentage", "error"],
        "properties": {
            "is_hallucination": {
                "type": "boolean",
                "description": "Whether the output contains content unsupported by or contradicting the input"
            },
            "rationale": {
                "type": "string",
                "description": "Explanation for the verdict"
            },
            "delusion_percentage": {
                "type": "number",
                "minimum": 0,
                "maximum": 100,
                "description": "Estimated degree of hallucination, 0-100"
            },
            "error": {
                "type": ["string", "null"],
                "description": "Always null; reserved for the caller"
            }
        },
        "additionalProperties": false
    })
}

/// Judge backed by the OpenAI Responses API.
pub struct OpenAiJudge {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiJudge {
    /// Create a new judge with a client configured from `config`.
    pub fn new(config: OpenAiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn build_request(&self, instruction: &str, settings: &LlmSettings) -> ResponsesRequest {
        ResponsesRequest {
            model: settings.model.clone(),
            input: instruction.to_string(),
            stream: false,
            temperature: settings.temperature,
            max_output_tokens: settings.max_tokens,
            text: json!({
                "format": {
                    "type": "json_schema",
                    "json_schema": {
                        "name": "hallucination_evaluation",
                        "strict": true,
                        "schema": evaluation_schema()
                    }
                }
            }),
        }
    }
}

#[async_trait]
impl StructuredJudge for OpenAiJudge {
    async fn judge(
        &self,
        instruction: &str,
        settings: &LlmSettings,
    ) -> Result<Option<HallucinationEvaluation>, UpstreamError> {
        let request = self.build_request(instruction, settings);

        tracing::debug!(
            model = %settings.model,
            max_output_tokens = settings.max_tokens,
            "Sending structured evaluation request"
        );

        let response = self
            .client
            .post(format!("{}/responses", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Api { status, body });
        }

        let parsed: ResponsesResponse = response.json().await?;

        match parsed.output_text() {
            Some(text) => {
                let evaluation: HallucinationEvaluation = serde_json::from_str(text)?;
                Ok(Some(evaluation))
            }
            None => Ok(None),
        }
    }
}
