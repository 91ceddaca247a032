//! HTTP API layer for Nicotine.
//!
//! Provides the health endpoints and the detection endpoint.

pub mod handlers;
mod routes;
mod types;

pub use routes::build_router;
