//! HTTP API server for the darkroom image transformation service.
//!
//! This crate provides the HTTP surface over the tiered transform pipeline:
//! - `/show`, `/get`, `/redirect` transform endpoints sharing one pipeline
//! - optional `/upload` source ingestion
//! - `/health` liveness probe

pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
