//! Core domain types for the darkroom image transformation service.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Request parameter validation and normalization (`ParamSet`)
//! - Deterministic transform-key derivation
//! - Application configuration

pub mod config;
pub mod key;
pub mod params;

pub use config::{
    AppConfig, CacheStoreConfig, OptionsConfig, ServerConfig, StorageConfig, StorageSection,
};
pub use key::transform_key;
pub use params::{FlipDirection, OutputFormat, ParamSet, RawParams, TransformMode};
