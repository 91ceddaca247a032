//! Hallucination evaluation results.
//!
//! Represents the upstream model's judgment of an LLM output, or the
//! conservative default when the upstream call could not produce one.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Evaluation of hallucinations in an LLM output.
///
/// `error` is populated only when the upstream call or its parsing failed.
/// In that case the evaluation carries the conservative defaults
/// (`is_hallucination = false`, `delusion_percentage = 0.0`): an unknown
/// verdict is never reported as a flagged one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HallucinationEvaluation {
    /// Whether the output contains hallucinated content.
    pub is_hallucination: bool,
    /// The model's explanation for its verdict.
    pub rationale: String,
    /// Estimated degree of hallucination, 0-100.
    pub delusion_percentage: f64,
    /// Stringified cause when the upstream call failed; null on success.
    #[serde(default)]
    pub error: Option<String>,
}

impl HallucinationEvaluation {
    /// Default evaluation for when the upstream structured output came back
    /// empty or unparsed.
    pub fn parse_failure() -> Self {
        Self {
            is_hallucination: false,
            rationale: "Parsing failed (None returned)".to_string(),
            delusion_percentage: 0.0,
            error: Some("output_parsed was None".to_string()),
        }
    }

    /// Default evaluation for when the upstream call itself failed
    /// (network, auth, rate limit, timeout, malformed response).
    pub fn upstream_failure(cause: impl ToString) -> Self {
        Self {
            is_hallucination: false,
            rationale: "Error detecting hallucinations".to_string(),
            delusion_percentage: 0.0,
            error: Some(cause.to_string()),
        }
    }
}
