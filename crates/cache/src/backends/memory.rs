//! In-process cache store.

use crate::error::CacheStoreResult;
use crate::traits::{CacheRecord, CacheStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process map of serialized records.
///
/// Contents are lost on restart and shared with nothing outside the
/// process; suitable for single-instance deployments and tests. Records
/// are stored as JSON strings so this backend exercises the same
/// serialization path as the external one.
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> CacheStoreResult<Option<CacheRecord>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, record: &CacheRecord) -> CacheStoreResult<()> {
        let raw = serde_json::to_string(record)?;
        self.entries.write().await.insert(key.to_string(), raw);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> CacheRecord {
        CacheRecord {
            filename: "abc.png".to_string(),
            path: "cache/media/abc.png".to_string(),
            url: "http://localhost/files/cache/media/abc.png".to_string(),
        }
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cache/media/abc.png").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        store.set("cache/media/abc.png", &record()).await.unwrap();

        let cached = store.get("cache/media/abc.png").await.unwrap().unwrap();
        assert_eq!(cached, record());
    }
}
