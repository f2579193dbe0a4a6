//! Cache store error types.

use thiserror::Error;

/// Cache store operation errors.
#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("record serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for cache store operations.
pub type CacheStoreResult<T> = std::result::Result<T, CacheStoreError>;
