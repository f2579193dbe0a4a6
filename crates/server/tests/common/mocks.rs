//! Call-counting test doubles for the pipeline tiers.
//!
//! Each double wraps an in-memory map and counts the calls the pipeline
//! makes, so tests can assert which tiers were (not) touched.

use async_trait::async_trait;
use bytes::Bytes;
use darkroom_cache::{CacheRecord, CacheStore, CacheStoreResult};
use darkroom_core::params::ParamSet;
use darkroom_engine::{EngineResult, TransformEngine};
use darkroom_storage::{SourceStorage, StorageError, StorageResult, StoreStorage};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Cache store double that counts gets and sets.
#[allow(dead_code)]
pub struct CountingCacheStore {
    entries: Mutex<HashMap<String, CacheRecord>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
}

#[allow(dead_code)]
impl CountingCacheStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(HashMap::new()),
            gets: AtomicUsize::new(0),
            sets: AtomicUsize::new(0),
        })
    }

    /// Seed a record as if a previous request had populated it.
    pub fn preload(&self, key: &str, record: CacheRecord) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), record);
    }

    pub fn record_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl CacheStore for CountingCacheStore {
    async fn get(&self, key: &str) -> CacheStoreResult<Option<CacheRecord>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, record: &CacheRecord) -> CacheStoreResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), record.clone());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "counting-cache"
    }
}

/// Source storage double over an in-memory map.
#[allow(dead_code)]
pub struct CountingSourceStorage {
    files: Mutex<HashMap<String, Bytes>>,
    pub exists_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingSourceStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            files: Mutex::new(HashMap::new()),
            exists_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        })
    }

    pub fn insert(&self, path: &str, data: Vec<u8>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), Bytes::from(data));
    }
}

#[async_trait]
impl SourceStorage for CountingSourceStorage {
    async fn exists(&self, path: &str) -> StorageResult<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.files.lock().unwrap().contains_key(path))
    }

    async fn get(&self, path: &str) -> StorageResult<Bytes> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn put(&self, path: &str, data: Bytes) -> StorageResult<()> {
        self.files.lock().unwrap().insert(path.to_string(), data);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "counting-source"
    }
}

/// Store storage double with a fixed namespace and URL scheme.
#[allow(dead_code)]
pub struct CountingStoreStorage {
    objects: Mutex<HashMap<String, Bytes>>,
    fail_saves: bool,
    pub exists_calls: AtomicUsize,
    pub save_calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingStoreStorage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            objects: Mutex::new(HashMap::new()),
            fail_saves: false,
            exists_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
        })
    }

    /// A store whose writes always fail, for durability-failure tests.
    pub fn failing_saves() -> Arc<Self> {
        Arc::new(Self {
            objects: Mutex::new(HashMap::new()),
            fail_saves: true,
            exists_calls: AtomicUsize::new(0),
            save_calls: AtomicUsize::new(0),
        })
    }

    /// Seed a stored object as if a previous request had computed it.
    pub fn insert(&self, key: &str, data: Vec<u8>) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::from(data));
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl StoreStorage for CountingStoreStorage {
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.objects.lock().unwrap().contains_key(key))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn save(&self, key: &str, data: Bytes) -> StorageResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(StorageError::Backend("save rejected by test".to_string()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    fn object_path(&self, key: &str) -> String {
        format!("cache/test/{key}")
    }

    fn url_for(&self, key: &str) -> String {
        format!("http://store.test/cache/test/{key}")
    }

    fn backend_name(&self) -> &'static str {
        "counting-store"
    }
}

/// Engine double returning fixed bytes.
#[allow(dead_code)]
pub struct CountingEngine {
    output: Vec<u8>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl CountingEngine {
    pub fn new(output: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            output,
            calls: AtomicUsize::new(0),
        })
    }
}

impl TransformEngine for CountingEngine {
    fn transform(&self, _params: &ParamSet, _source: &[u8]) -> EngineResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}
