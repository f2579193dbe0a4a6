//! The tiered lookup-then-compute resolution pipeline.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use bytes::Bytes;
use darkroom_cache::CacheRecord;
use darkroom_core::params::ParamSet;
use tracing::debug;

/// Resolve the stored object for `key`, computing it on a full miss.
///
/// Tiers, in order, with no backtracking:
/// 1. cache store lookup — trusts the record as-is; store storage is not
///    probed to verify the object still exists
/// 2. store storage existence check — synthesizes a record and re-populates
///    the cache, since a cache miss over an existing object is cheap to heal
/// 3. compute — read the source, transform, persist, populate the cache
///
/// Concurrent requests for the same key may duplicate the compute tier; the
/// transform is deterministic and writes are idempotent, so the extra work
/// is wasted but harmless. A per-key single-flight guard would remove the
/// duplication.
pub async fn resolve(state: &AppState, key: &str, params: &ParamSet) -> ApiResult<CacheRecord> {
    let record_key = state.store_storage.object_path(key);

    if let Some(cache_store) = &state.cache_store {
        if let Some(record) = cache_store.get(&record_key).await? {
            debug!(key, backend = cache_store.backend_name(), "cache store hit");
            return Ok(record);
        }
    }

    if state.store_storage.exists(key).await? {
        debug!(key, "store storage hit");
        let record = record_for(state, key);
        populate_cache(state, &record_key, &record).await?;
        return Ok(record);
    }

    if !state.source_storage.exists(&params.path).await? {
        return Err(ApiError::SourceNotFound(params.path.clone()));
    }

    let source = state.source_storage.get(&params.path).await?;
    let transformed = run_transform(state, params.clone(), source).await?;
    // A failed store write must fail the whole request; success is only
    // reported once the object is durably persisted.
    state
        .store_storage
        .save(key, Bytes::from(transformed))
        .await?;
    debug!(key, path = %params.path, mode = %params.mode, "transform computed and persisted");

    let record = record_for(state, key);
    populate_cache(state, &record_key, &record).await?;
    Ok(record)
}

fn record_for(state: &AppState, key: &str) -> CacheRecord {
    CacheRecord {
        filename: key.to_string(),
        path: state.store_storage.object_path(key),
        url: state.store_storage.url_for(key),
    }
}

async fn populate_cache(
    state: &AppState,
    record_key: &str,
    record: &CacheRecord,
) -> ApiResult<()> {
    if let Some(cache_store) = &state.cache_store {
        cache_store.set(record_key, record).await?;
    }
    Ok(())
}

/// Transforms are CPU-bound; run them off the async workers.
async fn run_transform(state: &AppState, params: ParamSet, source: Bytes) -> ApiResult<Vec<u8>> {
    let engine = state.engine.clone();
    tokio::task::spawn_blocking(move || engine.transform(&params, &source))
        .await
        .map_err(|e| ApiError::Internal(format!("transform task failed: {e}")))?
        .map_err(ApiError::from)
}
