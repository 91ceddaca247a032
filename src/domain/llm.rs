//! LLM input/output records.
//!
//! These mirror what the caller's own LLM exchange looked like; the service
//! never generates or deduplicates ids.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Settings used for an LLM call, passed through verbatim to the upstream
/// evaluation call. No bounds are enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LlmSettings {
    /// Model identifier (e.g. "gpt-4.1").
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum output tokens for the upstream call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4.1".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Input to an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LlmInput {
    /// Caller-supplied identifier.
    pub id: String,
    /// The prompt that was sent to the LLM.
    pub prompt: String,
    /// Settings used for the call.
    pub settings: LlmSettings,
}

/// Output from an LLM. This is the unit submitted for evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LlmOutput {
    /// Caller-supplied identifier.
    pub id: String,
    /// The prompt that produced the output.
    pub prompt: String,
    /// The text the LLM produced.
    pub output: String,
    /// Settings used for the call.
    pub settings: LlmSettings,
}
