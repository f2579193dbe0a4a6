//! Application state shared across handlers.

use darkroom_cache::CacheStore;
use darkroom_core::config::AppConfig;
use darkroom_engine::TransformEngine;
use darkroom_storage::{SourceStorage, StoreStorage};
use std::sync::Arc;

/// Shared application state, constructed once at startup and passed into the
/// handlers by the router; there is no ambient global state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Cache tier; `None` disables cache lookups entirely.
    pub cache_store: Option<Arc<dyn CacheStore>>,
    /// Read side holding original images.
    pub source_storage: Arc<dyn SourceStorage>,
    /// Durable side holding transformed results.
    pub store_storage: Arc<dyn StoreStorage>,
    /// Transform engine.
    pub engine: Arc<dyn TransformEngine>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        cache_store: Option<Arc<dyn CacheStore>>,
        source_storage: Arc<dyn SourceStorage>,
        store_storage: Arc<dyn StoreStorage>,
        engine: Arc<dyn TransformEngine>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            cache_store,
            source_storage,
            store_storage,
            engine,
        }
    }
}
