// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests for MarketDataCache
//!
//! Each test drives the facade with a manual clock and a counting upstream
//! mock, and checks both the number of upstream calls and the provenance
//! reported for every response.

mod helpers;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use fxcache::{
    CacheConfig, CacheConfigBuilder, CacheKey, CacheStatus, CachingSignals, DiskStore, Freshness,
    KlineParams, ManualClock, MarketDataCache, MarketDataRequest, StoreKind,
};
use helpers::{clock_at_jst, init_tracing, jst, MockUpstream};
use tempfile::TempDir;

fn config(dir: &Path) -> CacheConfig {
    CacheConfigBuilder::with_defaults().cache_dir(dir).build()
}

fn cache_in(dir: &Path, clock: &Arc<ManualClock>) -> MarketDataCache {
    MarketDataCache::with_clock(config(dir), clock.clone()).expect("cache dir should be usable")
}

fn klines(interval: &str, date: &str) -> (MarketDataRequest, KlineParams) {
    let params = KlineParams::new("USD_JPY", "BID", interval, date).unwrap();
    (MarketDataRequest::Klines(params.clone()), params)
}

fn no_signals() -> CachingSignals {
    CachingSignals::default()
}

fn entry_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
        .count()
}

#[tokio::test]
async fn test_ticker_served_from_memory_until_ttl_elapses() -> anyhow::Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();
    let request = MarketDataRequest::Ticker;

    let first = cache
        .get_or_fetch(&request, &no_signals(), || upstream.ticker())
        .await?;
    assert_eq!(first.provenance.status, CacheStatus::Miss);
    assert_eq!(first.provenance.store, Some(StoreKind::Memory));
    assert_eq!(first.provenance.freshness, Freshness::Ttl(Duration::from_secs(5)));

    clock.advance(Duration::from_secs(4));
    let second = cache
        .get_or_fetch(&request, &no_signals(), || upstream.ticker())
        .await?;
    assert!(second.provenance.is_hit());
    assert_eq!(second.value, first.value);
    assert_eq!(upstream.calls(), 1);

    clock.advance(Duration::from_secs(2));
    let third = cache
        .get_or_fetch(&request, &no_signals(), || upstream.ticker())
        .await?;
    assert_eq!(third.provenance.status, CacheStatus::Miss);
    assert_eq!(third.value.data[0].bid, "149.002");
    assert_eq!(upstream.calls(), 2);

    // Live data never reaches the disk
    assert_eq!(entry_files(dir.path()), 0);
    Ok(())
}

#[tokio::test]
async fn test_status_uses_its_own_ttl() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();

    cache
        .get_or_fetch(&MarketDataRequest::Status, &no_signals(), || upstream.status())
        .await?;
    clock.advance(Duration::from_secs(30));
    let cached = cache
        .get_or_fetch(&MarketDataRequest::Status, &no_signals(), || upstream.status())
        .await?;
    assert!(cached.provenance.is_hit());

    clock.advance(Duration::from_secs(1));
    cache
        .get_or_fetch(&MarketDataRequest::Status, &no_signals(), || upstream.status())
        .await?;
    assert_eq!(upstream.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_historical_klines_survive_restart() -> anyhow::Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let upstream = MockUpstream::new();
    let (request, params) = klines("1min", "20240313");

    let first = cache_in(dir.path(), &clock)
        .get_or_fetch(&request, &no_signals(), || upstream.klines(&params))
        .await?;
    assert_eq!(first.provenance.status, CacheStatus::Miss);
    assert_eq!(first.provenance.store, Some(StoreKind::Durable));
    assert_eq!(first.provenance.historical, Some(true));
    assert!(dir
        .path()
        .join(CacheKey::kline("USD_JPY", "BID", "1min", "20240313").file_name())
        .exists());

    // A fresh instance over the same directory, much later
    clock.advance(Duration::from_secs(30 * 24 * 3600));
    let restarted = cache_in(dir.path(), &clock);
    let second = restarted
        .get_or_fetch(&request, &no_signals(), || upstream.klines(&params))
        .await?;

    assert!(second.provenance.is_hit());
    assert_eq!(second.value, first.value);
    assert_eq!(upstream.calls(), 1);
    assert!(second
        .provenance
        .headers()
        .contains(&("X-Cache-TTL", "permanent".to_string())));
    Ok(())
}

#[tokio::test]
async fn test_current_trading_day_is_never_cached() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();
    let (request, params) = klines("1min", "20240314");

    for _ in 0..2 {
        let response = cache
            .get_or_fetch(&request, &no_signals(), || upstream.klines(&params))
            .await?;
        assert_eq!(response.provenance.status, CacheStatus::Bypass);
        assert_eq!(response.provenance.historical, Some(false));
    }

    assert_eq!(upstream.calls(), 2);
    assert_eq!(entry_files(dir.path()), 0);
    assert_eq!(cache.memory().size(), 0);
    Ok(())
}

#[tokio::test]
async fn test_trading_day_rolls_over_at_six_jst() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 5, 59);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();
    let (request, params) = klines("1min", "20240313");

    // Before 06:00 the 13th is still the running session
    let early = cache
        .get_or_fetch(&request, &no_signals(), || upstream.klines(&params))
        .await?;
    assert_eq!(early.provenance.status, CacheStatus::Bypass);

    clock.set(jst(2024, 3, 14, 6, 0));
    let closed = cache
        .get_or_fetch(&request, &no_signals(), || upstream.klines(&params))
        .await?;
    assert_eq!(closed.provenance.status, CacheStatus::Miss);
    assert_eq!(closed.provenance.store, Some(StoreKind::Durable));

    let again = cache
        .get_or_fetch(&request, &no_signals(), || upstream.klines(&params))
        .await?;
    assert!(again.provenance.is_hit());
    assert_eq!(upstream.calls(), 2);
    Ok(())
}

#[tokio::test]
async fn test_yearly_klines_follow_trading_year() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    // 2024-01-01 05:00 JST is still trading day 2023-12-31
    let clock = clock_at_jst(2024, 1, 1, 5, 0);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();
    let (request, params) = klines("1day", "2023");

    let response = cache
        .get_or_fetch(&request, &no_signals(), || upstream.klines(&params))
        .await?;
    assert_eq!(response.provenance.status, CacheStatus::Bypass);

    clock.set(jst(2024, 1, 1, 6, 0));
    let response = cache
        .get_or_fetch(&request, &no_signals(), || upstream.klines(&params))
        .await?;
    assert_eq!(response.provenance.store, Some(StoreKind::Durable));
    assert_eq!(entry_files(dir.path()), 1);
    Ok(())
}

#[tokio::test]
async fn test_override_signals_skip_read_and_write() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();

    let warm = cache
        .get_or_fetch(&MarketDataRequest::Ticker, &no_signals(), || upstream.ticker())
        .await?;

    let disabled = CachingSignals::from_request([("cache", "false")], Vec::<(&str, &str)>::new());
    let bypassed = cache
        .get_or_fetch(&MarketDataRequest::Ticker, &disabled, || upstream.ticker())
        .await?;
    assert_eq!(bypassed.provenance.status, CacheStatus::Bypass);
    assert_eq!(bypassed.provenance.headers(), vec![("X-Cache", "BYPASS".to_string())]);
    assert_ne!(bypassed.value, warm.value);

    // The bypassed response did not replace the cached one
    let cached = cache
        .get_or_fetch(&MarketDataRequest::Ticker, &no_signals(), || upstream.ticker())
        .await?;
    assert_eq!(cached.value, warm.value);
    assert_eq!(upstream.calls(), 2);

    let no_store = CachingSignals::from_request(
        Vec::<(&str, &str)>::new(),
        [("Cache-Control", "no-store")],
    );
    let (request, params) = klines("1min", "20240313");
    let response = cache
        .get_or_fetch(&request, &no_store, || upstream.klines(&params))
        .await?;
    assert_eq!(response.provenance.status, CacheStatus::Bypass);
    assert_eq!(entry_files(dir.path()), 0);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_durable_entry_is_refetched() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();

    std::fs::write(
        dir.path().join(CacheKey::symbols().file_name()),
        b"{\"value\": [trunc",
    )?;

    let response = cache
        .get_or_fetch(&MarketDataRequest::Symbols, &no_signals(), || upstream.symbols())
        .await?;
    assert_eq!(response.provenance.status, CacheStatus::Miss);
    assert_eq!(response.value.data[0].tick_size, "0.001");

    let response = cache
        .get_or_fetch(&MarketDataRequest::Symbols, &no_signals(), || upstream.symbols())
        .await?;
    assert!(response.provenance.is_hit());
    assert_eq!(upstream.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_unwritable_store_never_fails_the_request() -> anyhow::Result<()> {
    init_tracing();
    let dir = TempDir::new()?;
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"")?;
    let root = blocker.join("cache");
    let clock = clock_at_jst(2024, 3, 14, 10, 0);

    assert!(MarketDataCache::with_clock(config(&root), clock.clone()).is_err());

    let cache = MarketDataCache::with_durable_store(
        config(&root),
        clock.clone(),
        Arc::new(DiskStore::new(&root, clock.clone())),
    );
    let upstream = MockUpstream::new();

    for _ in 0..2 {
        let response = cache
            .get_or_fetch(&MarketDataRequest::Symbols, &no_signals(), || upstream.symbols())
            .await?;
        assert_eq!(response.provenance.status, CacheStatus::Miss);
    }
    assert_eq!(upstream.calls(), 2);
    assert_eq!(cache.durable().stats().await.write_failures, 2);
    Ok(())
}

#[tokio::test]
async fn test_fetch_error_is_returned_unchanged() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();
    upstream.fail();

    let err = cache
        .get_or_fetch(&MarketDataRequest::Symbols, &no_signals(), || upstream.symbols())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "upstream returned 503");
    assert_eq!(entry_files(dir.path()), 0);
    Ok(())
}

#[tokio::test]
async fn test_persist_disabled_fetches_durable_data_every_time() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let config = CacheConfigBuilder::with_defaults()
        .cache_dir(dir.path())
        .persist(false)
        .build();
    let cache = MarketDataCache::with_clock(config, clock)?;
    let upstream = MockUpstream::new();

    for _ in 0..2 {
        cache
            .get_or_fetch(&MarketDataRequest::Symbols, &no_signals(), || upstream.symbols())
            .await?;
    }
    assert_eq!(upstream.calls(), 2);
    assert_eq!(entry_files(dir.path()), 0);

    // Live data still uses memory
    for _ in 0..2 {
        cache
            .get_or_fetch(&MarketDataRequest::Ticker, &no_signals(), || upstream.ticker())
            .await?;
    }
    assert_eq!(upstream.calls(), 3);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_bounds_memory() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let clock = clock_at_jst(2024, 3, 14, 10, 0);
    let cache = cache_in(dir.path(), &clock);
    let upstream = MockUpstream::new();

    cache
        .get_or_fetch(&MarketDataRequest::Ticker, &no_signals(), || upstream.ticker())
        .await?;
    assert_eq!(cache.memory().size(), 1);

    let handle = cache.spawn_sweeper();
    clock.advance(Duration::from_secs(10));
    tokio::time::sleep(Duration::from_secs(61)).await;
    assert_eq!(cache.memory().size(), 0);

    handle.abort();
    Ok(())
}
