//! S3-backed storage using the AWS SDK.

use crate::error::{StorageError, StorageResult};
use crate::traits::{SourceStorage, StoreStorage};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::path::Path;
use tracing::instrument;

/// Build an S3 client from static credentials.
fn build_client(access_key_id: &str, secret_access_key: &str, region: &str) -> Client {
    let credentials = aws_sdk_s3::config::Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "darkroom-config",
    );
    let config = aws_sdk_s3::config::Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(aws_sdk_s3::config::Region::new(region.to_string()))
        .credentials_provider(credentials)
        .build();
    Client::from_conf(config)
}

/// Join a location prefix and a relative path into an object key.
fn join_key(location: &str, path: &str) -> String {
    let location = location.trim_matches('/');
    let path = path.trim_start_matches('/');
    if location.is_empty() {
        path.to_string()
    } else {
        format!("{location}/{path}")
    }
}

fn content_type_for(key: &str) -> Option<&'static str> {
    match Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => Some("image/png"),
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        _ => None,
    }
}

async fn object_exists(client: &Client, bucket: &str, key: &str) -> StorageResult<bool> {
    match client.head_object().bucket(bucket).key(key).send().await {
        Ok(_) => Ok(true),
        Err(err) => {
            let service = err.into_service_error();
            if service.is_not_found() {
                Ok(false)
            } else {
                Err(StorageError::Backend(format!(
                    "s3 head_object failed for {key}: {service}"
                )))
            }
        }
    }
}

async fn object_get(client: &Client, bucket: &str, key: &str, name: &str) -> StorageResult<Bytes> {
    let result = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|err| {
            let service = err.into_service_error();
            if service.is_no_such_key() {
                StorageError::NotFound(name.to_string())
            } else {
                StorageError::Backend(format!("s3 get_object failed for {key}: {service}"))
            }
        })?;

    let data = result
        .body
        .collect()
        .await
        .map_err(|e| StorageError::Backend(format!("failed to read s3 body for {key}: {e}")))?
        .into_bytes();
    Ok(data)
}

async fn object_put(client: &Client, bucket: &str, key: &str, data: Bytes) -> StorageResult<()> {
    let mut request = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(data.to_vec()));
    if let Some(content_type) = content_type_for(key) {
        request = request.content_type(content_type);
    }

    request.send().await.map_err(|err| {
        StorageError::Backend(format!(
            "s3 put_object failed for {key}: {}",
            err.into_service_error()
        ))
    })?;
    Ok(())
}

/// Source storage reading originals from an S3 bucket.
pub struct S3SourceStorage {
    client: Client,
    bucket: String,
    location: String,
}

impl S3SourceStorage {
    pub fn new(
        access_key_id: &str,
        secret_access_key: &str,
        bucket: &str,
        region: &str,
        location: &str,
    ) -> Self {
        Self {
            client: build_client(access_key_id, secret_access_key, region),
            bucket: bucket.to_string(),
            location: location.to_string(),
        }
    }
}

#[async_trait]
impl SourceStorage for S3SourceStorage {
    #[instrument(skip(self), fields(backend = "s3", bucket = %self.bucket))]
    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let key = join_key(&self.location, path);
        object_exists(&self.client, &self.bucket, &key).await
    }

    #[instrument(skip(self), fields(backend = "s3", bucket = %self.bucket))]
    async fn get(&self, path: &str) -> StorageResult<Bytes> {
        let key = join_key(&self.location, path);
        object_get(&self.client, &self.bucket, &key, path).await
    }

    #[instrument(skip(self, data), fields(backend = "s3", bucket = %self.bucket, len = data.len()))]
    async fn put(&self, path: &str, data: Bytes) -> StorageResult<()> {
        let key = join_key(&self.location, path);
        object_put(&self.client, &self.bucket, &key, data).await
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}

/// Store storage persisting transformed results in an S3 bucket.
pub struct S3StoreStorage {
    client: Client,
    bucket: String,
    region: String,
    namespace: String,
}

impl S3StoreStorage {
    pub fn new(
        access_key_id: &str,
        secret_access_key: &str,
        bucket: &str,
        region: &str,
        location: &str,
    ) -> Self {
        Self {
            client: build_client(access_key_id, secret_access_key, region),
            bucket: bucket.to_string(),
            region: region.to_string(),
            namespace: format!("cache/{}", location.trim_matches('/')),
        }
    }
}

#[async_trait]
impl StoreStorage for S3StoreStorage {
    #[instrument(skip(self), fields(backend = "s3", bucket = %self.bucket))]
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        object_exists(&self.client, &self.bucket, &self.object_path(key)).await
    }

    #[instrument(skip(self), fields(backend = "s3", bucket = %self.bucket))]
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        object_get(&self.client, &self.bucket, &self.object_path(key), key).await
    }

    #[instrument(skip(self, data), fields(backend = "s3", bucket = %self.bucket, len = data.len()))]
    async fn save(&self, key: &str, data: Bytes) -> StorageResult<()> {
        object_put(&self.client, &self.bucket, &self.object_path(key), data).await
    }

    fn object_path(&self, key: &str) -> String {
        format!("{}/{key}", self.namespace)
    }

    fn url_for(&self, key: &str) -> String {
        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            self.bucket,
            self.region,
            self.object_path(key)
        )
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
