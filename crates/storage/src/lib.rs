//! Storage abstraction and backends for darkroom.
//!
//! This crate provides:
//! - `SourceStorage`: read access to original images by path
//! - `StoreStorage`: durable storage of transformed results by transform key,
//!   with stable object paths and public URL generation
//! - Backends: local filesystem and S3

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::filesystem::{FilesystemSourceStorage, FilesystemStoreStorage};
pub use backends::s3::{S3SourceStorage, S3StoreStorage};
pub use error::{StorageError, StorageResult};
pub use traits::{SourceStorage, StoreStorage};

use darkroom_core::config::StorageConfig;
use std::sync::Arc;

/// Create a source storage backend from configuration.
pub async fn source_from_config(config: &StorageConfig) -> StorageResult<Arc<dyn SourceStorage>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StorageConfig::Filesystem { location, .. } => {
            let backend = FilesystemSourceStorage::new(location).await?;
            Ok(Arc::new(backend))
        }
        StorageConfig::S3 {
            access_key_id,
            secret_access_key,
            bucket,
            region,
            location,
        } => Ok(Arc::new(S3SourceStorage::new(
            access_key_id,
            secret_access_key,
            bucket,
            region,
            location,
        ))),
    }
}

/// Create a store storage backend from configuration.
pub async fn store_from_config(config: &StorageConfig) -> StorageResult<Arc<dyn StoreStorage>> {
    config.validate_as_store().map_err(StorageError::Config)?;

    match config {
        StorageConfig::Filesystem { location, base_url } => {
            let base_url = base_url.clone().ok_or_else(|| {
                StorageError::Config(
                    "filesystem store storage requires 'base_url' for URL generation".to_string(),
                )
            })?;
            let backend = FilesystemStoreStorage::new(location, base_url).await?;
            Ok(Arc::new(backend))
        }
        StorageConfig::S3 {
            access_key_id,
            secret_access_key,
            bucket,
            region,
            location,
        } => Ok(Arc::new(S3StoreStorage::new(
            access_key_id,
            secret_access_key,
            bucket,
            region,
            location,
        ))),
    }
}
