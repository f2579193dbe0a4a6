//! Cache store abstraction and backends for darkroom.
//!
//! The cache tier holds one small metadata record per transform key so
//! repeat requests can be answered without touching store storage at all.
//! Backends: in-process map and Redis.

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::memory::MemoryStore;
pub use backends::redis::RedisStore;
pub use error::{CacheStoreError, CacheStoreResult};
pub use traits::{CacheRecord, CacheStore};

use darkroom_core::config::CacheStoreConfig;
use std::sync::Arc;

/// Create a cache store backend from configuration.
pub async fn from_config(config: &CacheStoreConfig) -> CacheStoreResult<Arc<dyn CacheStore>> {
    match config {
        CacheStoreConfig::Memory => Ok(Arc::new(MemoryStore::new())),
        CacheStoreConfig::Redis {
            host,
            port,
            db,
            password,
        } => {
            let backend = RedisStore::connect(host, *port, *db, password.as_deref()).await?;
            Ok(Arc::new(backend))
        }
    }
}
