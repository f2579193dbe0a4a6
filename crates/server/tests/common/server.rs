//! Server test utilities.

use darkroom_cache::{CacheStore, MemoryStore};
use darkroom_core::config::{
    AppConfig, CacheStoreConfig, OptionsConfig, ServerConfig, StorageConfig, StorageSection,
};
use darkroom_engine::ImageEngine;
use darkroom_server::{AppState, create_router};
use darkroom_storage::{
    FilesystemSourceStorage, FilesystemStoreStorage, SourceStorage, StoreStorage,
};
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with filesystem storage, an in-memory cache tier
/// and the real image engine.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with uploads enabled.
    pub async fn new() -> Self {
        Self::with_options(true).await
    }

    pub async fn with_options(enable_upload: bool) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp directory");
        let source_root = temp_dir.path().join("originals");
        let store_root = temp_dir.path().join("media");
        let base_url = "http://localhost:6001/files".to_string();

        let source_storage: Arc<dyn SourceStorage> = Arc::new(
            FilesystemSourceStorage::new(&source_root)
                .await
                .expect("failed to create source storage"),
        );
        let store_storage: Arc<dyn StoreStorage> = Arc::new(
            FilesystemStoreStorage::new(&store_root, base_url.clone())
                .await
                .expect("failed to create store storage"),
        );
        let cache_store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());

        let config = AppConfig {
            server: ServerConfig::default(),
            cache_store: Some(CacheStoreConfig::Memory),
            storage: StorageSection {
                source: Some(StorageConfig::Filesystem {
                    location: source_root,
                    base_url: None,
                }),
                store: StorageConfig::Filesystem {
                    location: store_root,
                    base_url: Some(base_url),
                },
            },
            options: OptionsConfig { enable_upload },
        };

        let state = AppState::new(
            config,
            Some(cache_store),
            source_storage,
            store_storage,
            Arc::new(ImageEngine::new()),
        );
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Seed an original image on source storage.
    pub async fn seed_source(&self, path: &str, data: Vec<u8>) {
        self.state
            .source_storage
            .put(path, bytes::Bytes::from(data))
            .await
            .expect("failed to seed source image");
    }
}
