//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Read side holding original, untransformed images addressable by path.
///
/// The transform pipeline only ever reads from source storage; `put` exists
/// for the optional upload endpoint, which ingests new originals through the
/// same boundary.
#[async_trait]
pub trait SourceStorage: Send + Sync + 'static {
    /// Check whether an original exists at `path`.
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Fetch the original bytes at `path`.
    async fn get(&self, path: &str) -> StorageResult<Bytes>;

    /// Ingest an original at `path`.
    async fn put(&self, path: &str, data: Bytes) -> StorageResult<()>;

    /// Static backend identifier for logging.
    fn backend_name(&self) -> &'static str;
}

/// Durable side holding transformed results, addressable by transform key.
///
/// Objects are written at most meaningfully once per key: the transform is
/// deterministic, so overwrites are idempotent no-ops in effect.
#[async_trait]
pub trait StoreStorage: Send + Sync + 'static {
    /// Check whether a transformed object exists for `key`.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Fetch the transformed bytes for `key`.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Persist the transformed bytes for `key`.
    async fn save(&self, key: &str, data: Bytes) -> StorageResult<()>;

    /// Namespaced object path (`cache/<normalized location>/<key>`).
    ///
    /// This path is stable across restarts; it doubles as the cache store
    /// record key, so it must never depend on process state.
    fn object_path(&self, key: &str) -> String;

    /// Public URL of the object for `key`.
    fn url_for(&self, key: &str) -> String;

    /// Static backend identifier for logging.
    fn backend_name(&self) -> &'static str;
}
