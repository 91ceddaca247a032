//! Domain types for Nicotine.
//!
//! The value records exchanged at the service boundary.

mod evaluation;
mod llm;

pub use evaluation::*;
pub use llm::*;
