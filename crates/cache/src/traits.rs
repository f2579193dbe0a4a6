//! Cache store trait and record model.

use crate::error::CacheStoreResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata cached for a previously computed transform.
///
/// Created on the first successful computation of a key and never mutated;
/// eviction is owned by the backing store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The transform key (digest plus format extension).
    pub filename: String,
    /// Namespaced object path on store storage.
    pub path: String,
    /// Public URL of the stored object.
    pub url: String,
}

/// Fast lookup/write of one small metadata record per transform key.
///
/// Records are keyed by the store storage object path, so every process
/// sharing the same store storage reads and writes the same entries.
#[async_trait]
pub trait CacheStore: Send + Sync + 'static {
    /// Look up the record cached under `key`, if any.
    async fn get(&self, key: &str) -> CacheStoreResult<Option<CacheRecord>>;

    /// Cache `record` under `key`.
    async fn set(&self, key: &str, record: &CacheRecord) -> CacheStoreResult<()>;

    /// Static backend identifier for logging.
    fn backend_name(&self) -> &'static str;
}
