//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:6001").
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:6001".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Cache store backend configuration.
///
/// The cache tier holds small metadata records per transform key. Leaving
/// the section out of the configuration disables the tier entirely; the
/// store lookup tier still short-circuits recomputation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CacheStoreConfig {
    /// In-process map, lost on restart.
    Memory,
    /// External Redis key-value store.
    Redis {
        #[serde(default = "default_redis_host")]
        host: String,
        #[serde(default = "default_redis_port")]
        port: u16,
        /// Redis logical database index.
        #[serde(default)]
        db: i64,
        password: Option<String>,
    },
}

fn default_redis_host() -> String {
    "localhost".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

/// Regions accepted for S3-backed storage.
pub const SUPPORTED_S3_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-central-1",
    "ap-northeast-1",
    "ap-northeast-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "sa-east-1",
];

/// Storage backend configuration, used for both the source and store roles.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory holding the images.
        location: PathBuf,
        /// Public base URL under which `location` is served. Required when
        /// this configuration backs the store role.
        base_url: Option<String>,
    },
    /// S3-backed storage.
    S3 {
        access_key_id: String,
        secret_access_key: String,
        bucket: String,
        region: String,
        /// Key prefix within the bucket.
        location: String,
    },
}

impl StorageConfig {
    /// Validate invariants shared by the source and store roles.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StorageConfig::Filesystem { .. } => Ok(()),
            StorageConfig::S3 { region, .. } => {
                if SUPPORTED_S3_REGIONS.contains(&region.as_str()) {
                    Ok(())
                } else {
                    Err(format!("'{region}' is not a supported S3 region"))
                }
            }
        }
    }

    /// Validate requirements specific to the store role, which must be able
    /// to generate public URLs for stored objects.
    pub fn validate_as_store(&self) -> Result<(), String> {
        self.validate()?;
        match self {
            StorageConfig::Filesystem { base_url: None, .. } => Err(
                "filesystem store storage requires 'base_url' for URL generation".to_string(),
            ),
            _ => Ok(()),
        }
    }
}

/// Source and store storage selection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageSection {
    /// Read side holding original images. Falls back to `store` when absent.
    pub source: Option<StorageConfig>,
    /// Durable side holding transformed results.
    pub store: StorageConfig,
}

impl StorageSection {
    /// The configuration originals are read from.
    pub fn source_config(&self) -> &StorageConfig {
        self.source.as_ref().unwrap_or(&self.store)
    }
}

/// Feature toggles.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OptionsConfig {
    /// Mount the `POST /upload` source-ingestion endpoint.
    #[serde(default)]
    pub enable_upload: bool,
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// Optional cache tier.
    pub cache_store: Option<CacheStoreConfig>,
    /// Storage selection (required).
    pub storage: StorageSection,
    #[serde(default)]
    pub options: OptionsConfig,
}

impl AppConfig {
    /// Validate the full configuration. Any error here is fatal at startup;
    /// the process must not begin serving with a partially valid setup.
    pub fn validate(&self) -> Result<(), String> {
        self.storage
            .source_config()
            .validate()
            .map_err(|e| format!("storage.source: {e}"))?;
        self.storage
            .store
            .validate_as_store()
            .map_err(|e| format!("storage.store: {e}"))?;
        Ok(())
    }

    /// Create a test configuration backed by the filesystem under `root`,
    /// with no cache tier and uploads enabled.
    ///
    /// **For testing only.**
    pub fn for_testing(root: impl Into<PathBuf>) -> Self {
        Self {
            server: ServerConfig::default(),
            cache_store: None,
            storage: StorageSection {
                source: None,
                store: StorageConfig::Filesystem {
                    location: root.into(),
                    base_url: Some("http://localhost:6001/files".to_string()),
                },
            },
            options: OptionsConfig {
                enable_upload: true,
            },
        }
    }
}
