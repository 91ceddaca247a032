//! Hallucination detector - maps upstream judgments onto evaluations.
//!
//! The detector's contract is total: every failure path of the upstream
//! call is caught here and returned as a well-formed evaluation carrying
//! `error`, so callers can treat the pipeline as always producing a value.

use std::sync::Arc;

use async_trait::async_trait;

use crate::detection::openai::UpstreamError;
use crate::domain::{HallucinationEvaluation, LlmOutput, LlmSettings};

/// Trait for detection implementations.
///
/// The production implementation never returns `Err`; the `Result` exists so
/// the HTTP layer can guard against other implementations that do.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Evaluate an LLM output for hallucinations.
    async fn detect(&self, output: &LlmOutput) -> anyhow::Result<HallucinationEvaluation>;
}

/// Trait for the raw schema-guided upstream call.
///
/// `Ok(None)` means the call succeeded but the structured output came back
/// empty or unparsed.
#[async_trait]
pub trait StructuredJudge: Send + Sync {
    /// Ask the upstream model for an evaluation constrained to the
    /// `HallucinationEvaluation` shape.
    async fn judge(
        &self,
        instruction: &str,
        settings: &LlmSettings,
    ) -> Result<Option<HallucinationEvaluation>, UpstreamError>;
}

/// Build the evaluation instruction embedding the original prompt and output.
///
/// The wording is a reproducible artifact: changing it changes the upstream
/// model's output distribution, so it is kept fixed rather than tuned.
pub fn evaluation_instruction(output: &LlmOutput) -> String {
    format!(
        "You are a helpful assistant that detects hallucinations in the input.\n\
         \n\
         Input: {}\n\
         Output: {}",
        output.prompt, output.output
    )
}

/// Detector backed by a structured-output judge.
///
/// Single best-effort attempt per call: no retries, no backoff, no caching.
pub struct HallucinationDetector {
    judge: Arc<dyn StructuredJudge>,
}

impl HallucinationDetector {
    /// Create a detector over the given judge.
    pub fn new(judge: Arc<dyn StructuredJudge>) -> Self {
        Self { judge }
    }
}

#[async_trait]
impl Detector for HallucinationDetector {
    async fn detect(&self, output: &LlmOutput) -> anyhow::Result<HallucinationEvaluation> {
        let instruction = evaluation_instruction(output);

        let evaluation = match self.judge.judge(&instruction, &output.settings).await {
            Ok(Some(evaluation)) => evaluation,
            Ok(None) => {
                tracing::warn!(
                    id = %output.id,
                    model = %output.settings.model,
                    "Upstream returned no parsed evaluation, using defaults"
                );
                HallucinationEvaluation::parse_failure()
            }
            Err(e) => {
                tracing::error!(
                    id = %output.id,
                    model = %output.settings.model,
                    error = %e,
                    "Error detecting hallucinations, returning default values"
                );
                HallucinationEvaluation::upstream_failure(e)
            }
        };

        Ok(evaluation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedJudge {
        result: Result<Option<HallucinationEvaluation>, String>,
    }

    #[async_trait]
    impl StructuredJudge for FixedJudge {
        async fn judge(
            &self,
            _instruction: &str,
            _settings: &LlmSettings,
        ) -> Result<Option<HallucinationEvaluation>, UpstreamError> {
            match &self.result {
                Ok(eval) => Ok(eval.clone()),
                Err(msg) => Err(UpstreamError::Api {
                    status: reqwest::StatusCode::UNAUTHORIZED,
                    body: msg.clone(),
                }),
            }
        }
    }

    fn sample_output() -> LlmOutput {
        LlmOutput {
            id: "1".to_string(),
            prompt: "What is the capital of France?".to_string(),
            output: "Paris".to_string(),
            settings: LlmSettings::default(),
        }
    }

    #[tokio::test]
    async fn test_detect_passes_through_parsed_evaluation() {
        let expected = HallucinationEvaluation {
            is_hallucination: false,
            rationale: "Correct answer.".to_string(),
            delusion_percentage: 0.0,
            error: None,
        };
        let detector = HallucinationDetector::new(Arc::new(FixedJudge {
            result: Ok(Some(expected.clone())),
        }));

        let evaluation = detector.detect(&sample_output()).await.unwrap();
        assert_eq!(evaluation, expected);
    }

    #[tokio::test]
    async fn test_detect_maps_empty_parse_to_defaults() {
        let detector = HallucinationDetector::new(Arc::new(FixedJudge { result: Ok(None) }));

        let evaluation = detector.detect(&sample_output()).await.unwrap();
        assert!(!evaluation.is_hallucination);
        assert_eq!(evaluation.delusion_percentage, 0.0);
        assert_eq!(evaluation.rationale, "Parsing failed (None returned)");
        assert_eq!(evaluation.error.as_deref(), Some("output_parsed was None"));
    }

    #[tokio::test]
    async fn test_detect_never_propagates_upstream_errors() {
        let detector = HallucinationDetector::new(Arc::new(FixedJudge {
            result: Err("invalid api key".to_string()),
        }));

        let evaluation = detector.detect(&sample_output()).await.unwrap();
        assert!(!evaluation.is_hallucination);
        assert_eq!(evaluation.delusion_percentage, 0.0);
        assert_eq!(evaluation.rationale, "Error detecting hallucinations");
        let error = evaluation.error.expect("error should be populated");
        assert!(error.contains("invalid api key"));
    }

    #[test]
    fn test_instruction_embeds_prompt_and_output_verbatim() {
        let instruction = evaluation_instruction(&sample_output());
        assert!(instruction.contains("Input: What is the capital of France?"));
        assert!(instruction.contains("Output: Paris"));
    }
}
