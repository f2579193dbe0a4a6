//! Pipeline tier behavior, asserted against call-counting doubles.

mod common;

use common::mocks::{
    CountingCacheStore, CountingEngine, CountingSourceStorage, CountingStoreStorage,
};
use darkroom_cache::{CacheRecord, CacheStore};
use darkroom_core::config::AppConfig;
use darkroom_core::params::{ParamSet, RawParams};
use darkroom_core::transform_key;
use darkroom_engine::TransformEngine;
use darkroom_server::{ApiError, AppState, pipeline};
use darkroom_storage::{SourceStorage, StoreStorage};
use std::sync::Arc;
use std::sync::atomic::Ordering;

struct Harness {
    cache: Arc<CountingCacheStore>,
    source: Arc<CountingSourceStorage>,
    store: Arc<CountingStoreStorage>,
    engine: Arc<CountingEngine>,
    state: AppState,
}

fn build_harness(with_cache: bool) -> Harness {
    let cache = CountingCacheStore::new();
    let source = CountingSourceStorage::new();
    let store = CountingStoreStorage::new();
    let engine = CountingEngine::new(b"transformed-bytes".to_vec());

    let cache_store: Option<Arc<dyn CacheStore>> = if with_cache {
        let cache: Arc<dyn CacheStore> = cache.clone();
        Some(cache)
    } else {
        None
    };
    let source_storage: Arc<dyn SourceStorage> = source.clone();
    let store_storage: Arc<dyn StoreStorage> = store.clone();
    let engine_dyn: Arc<dyn TransformEngine> = engine.clone();

    let state = AppState::new(
        AppConfig::for_testing("unused"),
        cache_store,
        source_storage,
        store_storage,
        engine_dyn,
    );

    Harness {
        cache,
        source,
        store,
        engine,
        state,
    }
}

fn thumbnail_params(path: &str) -> ParamSet {
    let raw = RawParams {
        mode: Some("thumbnail".to_string()),
        path: Some(path.to_string()),
        width: Some("10".to_string()),
        height: Some("10".to_string()),
        ..Default::default()
    };
    raw.validate().expect("fixture params must validate")
}

#[tokio::test]
async fn cache_hit_short_circuits_every_other_tier() {
    let harness = build_harness(true);
    let params = thumbnail_params("cat.png");
    let key = transform_key(&params);

    let record = CacheRecord {
        filename: key.clone(),
        path: format!("cache/test/{key}"),
        url: format!("http://store.test/cache/test/{key}"),
    };
    harness
        .cache
        .preload(&format!("cache/test/{key}"), record.clone());

    let resolved = pipeline::resolve(&harness.state, &key, &params)
        .await
        .unwrap();

    assert_eq!(resolved, record);
    assert_eq!(harness.store.exists_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.source.exists_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.source.get_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn store_hit_skips_compute_and_repopulates_the_cache() {
    let harness = build_harness(true);
    let params = thumbnail_params("cat.png");
    let key = transform_key(&params);

    harness.store.insert(&key, b"previously computed".to_vec());

    let resolved = pipeline::resolve(&harness.state, &key, &params)
        .await
        .unwrap();

    assert_eq!(resolved.filename, key);
    assert_eq!(resolved.path, format!("cache/test/{key}"));
    assert_eq!(resolved.url, format!("http://store.test/cache/test/{key}"));

    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.source.get_calls.load(Ordering::SeqCst), 0);
    // The cheap-to-heal side effect: the record is back in the cache.
    assert_eq!(harness.cache.sets.load(Ordering::SeqCst), 1);
    assert_eq!(harness.cache.record_count(), 1);
}

#[tokio::test]
async fn full_miss_computes_once_then_serves_from_cache() {
    let harness = build_harness(true);
    harness.source.insert("cat.png", b"original".to_vec());

    let params = thumbnail_params("cat.png");
    let key = transform_key(&params);

    let first = pipeline::resolve(&harness.state, &key, &params)
        .await
        .unwrap();
    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.store.save_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.cache.sets.load(Ordering::SeqCst), 1);

    let second = pipeline::resolve(&harness.state, &key, &params)
        .await
        .unwrap();
    assert_eq!(first, second);
    // The repeat request is a cache hit: no second transform, no new reads.
    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.source.get_calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.store.save_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn without_a_cache_tier_the_store_tier_still_short_circuits() {
    let harness = build_harness(false);
    harness.source.insert("cat.png", b"original".to_vec());

    let params = thumbnail_params("cat.png");
    let key = transform_key(&params);

    pipeline::resolve(&harness.state, &key, &params)
        .await
        .unwrap();
    pipeline::resolve(&harness.state, &key, &params)
        .await
        .unwrap();

    // Second resolution found the object on store storage.
    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 1);
    assert_eq!(harness.cache.sets.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_source_fails_in_band_and_writes_nothing() {
    let harness = build_harness(true);
    let params = thumbnail_params("ghost.png");
    let key = transform_key(&params);

    match pipeline::resolve(&harness.state, &key, &params).await {
        Err(ApiError::SourceNotFound(path)) => assert_eq!(path, "ghost.png"),
        other => panic!("expected SourceNotFound, got {:?}", other.map(|_| ())),
    }

    assert_eq!(harness.engine.calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.store.save_calls.load(Ordering::SeqCst), 0);
    assert_eq!(harness.cache.sets.load(Ordering::SeqCst), 0);
    assert_eq!(harness.store.object_count(), 0);
}

#[tokio::test]
async fn store_write_failure_fails_the_request() {
    let cache = CountingCacheStore::new();
    let source = CountingSourceStorage::new();
    let store = CountingStoreStorage::failing_saves();
    let engine = CountingEngine::new(b"transformed-bytes".to_vec());
    source.insert("cat.png", b"original".to_vec());

    let cache_dyn: Arc<dyn CacheStore> = cache.clone();
    let source_storage: Arc<dyn SourceStorage> = source.clone();
    let store_storage: Arc<dyn StoreStorage> = store.clone();
    let engine_dyn: Arc<dyn TransformEngine> = engine.clone();
    let state = AppState::new(
        AppConfig::for_testing("unused"),
        Some(cache_dyn),
        source_storage,
        store_storage,
        engine_dyn,
    );

    let params = thumbnail_params("cat.png");
    let key = transform_key(&params);

    match pipeline::resolve(&state, &key, &params).await {
        Err(ApiError::Storage(_)) => {}
        other => panic!("expected storage error, got {:?}", other.map(|_| ())),
    }

    // The transform ran, but nothing claims success: no cache record exists.
    assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.sets.load(Ordering::SeqCst), 0);
}
