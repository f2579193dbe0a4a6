//! Local filesystem storage backends.

use crate::error::{StorageError, StorageResult};
use crate::traits::{SourceStorage, StoreStorage};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::instrument;

/// Validate a client-supplied path, rejecting anything that could escape the
/// storage root (absolute paths, parent references, prefix components).
fn safe_relative(path: &str) -> StorageResult<&Path> {
    if path.is_empty() {
        return Err(StorageError::InvalidPath("empty path".to_string()));
    }
    let relative = Path::new(path);
    for component in relative.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(StorageError::InvalidPath(format!(
                    "contains unsafe path component: {path}"
                )));
            }
        }
    }
    Ok(relative)
}

async fn ensure_parent(path: &Path) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}

fn map_not_found(err: std::io::Error, path: &str) -> StorageError {
    if err.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(path.to_string())
    } else {
        StorageError::Io(err)
    }
}

/// Source storage rooted at a local directory.
pub struct FilesystemSourceStorage {
    root: PathBuf,
}

impl FilesystemSourceStorage {
    pub async fn new(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }
}

#[async_trait]
impl SourceStorage for FilesystemSourceStorage {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full = self.root.join(safe_relative(path)?);
        Ok(fs::try_exists(&full).await? && fs::metadata(&full).await?.is_file())
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get(&self, path: &str) -> StorageResult<Bytes> {
        let full = self.root.join(safe_relative(path)?);
        let data = fs::read(&full).await.map_err(|e| map_not_found(e, path))?;
        Ok(Bytes::from(data))
    }

    #[instrument(skip(self, data), fields(backend = "filesystem", len = data.len()))]
    async fn put(&self, path: &str, data: Bytes) -> StorageResult<()> {
        let full = self.root.join(safe_relative(path)?);
        ensure_parent(&full).await?;
        fs::write(&full, &data).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}

/// Store storage rooted at a local directory served under a public base URL.
///
/// Objects live under the `cache/<normalized location>/<key>` namespace,
/// both on disk (relative to the root) and in generated URLs, so a static
/// file server pointed at the root serves them directly.
pub struct FilesystemStoreStorage {
    root: PathBuf,
    base_url: String,
    namespace: String,
}

impl FilesystemStoreStorage {
    pub async fn new(root: impl AsRef<Path>, base_url: String) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).await?;
        let location = root.to_string_lossy();
        let namespace = format!("cache/{}", location.trim_matches('/'));
        Ok(Self {
            root,
            base_url: base_url.trim_end_matches('/').to_string(),
            namespace,
        })
    }

    fn object_file(&self, key: &str) -> StorageResult<PathBuf> {
        safe_relative(key)?;
        Ok(self.root.join(&self.namespace).join(key))
    }
}

#[async_trait]
impl StoreStorage for FilesystemStoreStorage {
    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let full = self.object_file(key)?;
        fs::try_exists(&full).await.map_err(StorageError::Io)
    }

    #[instrument(skip(self), fields(backend = "filesystem"))]
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let full = self.object_file(key)?;
        let data = fs::read(&full).await.map_err(|e| map_not_found(e, key))?;
        Ok(Bytes::from(data))
    }

    #[instrument(skip(self, data), fields(backend = "filesystem", len = data.len()))]
    async fn save(&self, key: &str, data: Bytes) -> StorageResult<()> {
        let full = self.object_file(key)?;
        ensure_parent(&full).await?;
        fs::write(&full, &data).await?;
        Ok(())
    }

    fn object_path(&self, key: &str) -> String {
        format!("{}/{key}", self.namespace)
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, self.object_path(key))
    }

    fn backend_name(&self) -> &'static str {
        "filesystem"
    }
}
