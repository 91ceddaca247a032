//! Hallucination detection pipeline.
//!
//! Two seams:
//! - `StructuredJudge`: the raw schema-guided call to the upstream model
//! - `Detector`: what the HTTP layer sees; the production implementation
//!   normalizes every upstream failure into evaluation data

mod detector;
mod openai;

pub use detector::*;
pub use openai::*;
