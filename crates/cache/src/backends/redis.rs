//! Redis-backed cache store.

use crate::error::CacheStoreResult;
use crate::traits::{CacheRecord, CacheStore};
use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

/// External key-value cache store.
///
/// Records are stored as JSON strings with no TTL; eviction policy belongs
/// to the Redis deployment, not to this service.
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis. The connection manager transparently reconnects on
    /// connection loss.
    pub async fn connect(
        host: &str,
        port: u16,
        db: i64,
        password: Option<&str>,
    ) -> CacheStoreResult<Self> {
        let url = match password {
            Some(password) => format!("redis://:{password}@{host}:{port}/{db}"),
            None => format!("redis://{host}:{port}/{db}"),
        };
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> CacheStoreResult<Option<CacheRecord>> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.get(key).await?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, record: &CacheRecord) -> CacheStoreResult<()> {
        let raw = serde_json::to_string(record)?;
        let mut connection = self.connection.clone();
        connection.set::<_, _, ()>(key, raw).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
