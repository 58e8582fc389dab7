// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for fxcache integration tests
//!
//! Provides a counting mock of the upstream FX API and clock fixtures in
//! exchange time, so tests can assert exactly when the cache goes upstream.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use fxcache::{
    ApiResponse, ExchangeStatus, Kline, KlineParams, KlineResponse, ManualClock, MarketStatus,
    StatusResponse, SymbolResponse, SymbolRule, Ticker, TickerResponse,
};

/// UTC instant for a wall-clock time in Tokyo (UTC+9)
pub fn jst(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap() - chrono::Duration::hours(9)
}

/// Manual clock set to a Tokyo wall-clock time
pub fn clock_at_jst(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Arc<ManualClock> {
    ManualClock::shared(jst(year, month, day, hour, minute))
}

/// Installs a test subscriber once; honours `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Mock upstream API that counts every call
///
/// # Example
///
/// ```rust,ignore
/// let upstream = MockUpstream::new();
/// cache.get_or_fetch(&MarketDataRequest::Ticker, &signals, || upstream.ticker()).await?;
/// assert_eq!(upstream.calls(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockUpstream {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of upstream requests made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every following request fail
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn begin(&self) -> anyhow::Result<usize> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("upstream returned 503");
        }
        Ok(n)
    }

    pub async fn status(&self) -> anyhow::Result<StatusResponse> {
        let n = self.begin()?;
        Ok(envelope(
            MarketStatus {
                status: ExchangeStatus::Open,
            },
            n,
        ))
    }

    /// Ticker whose bid encodes the call number, so a refetch is observable
    pub async fn ticker(&self) -> anyhow::Result<TickerResponse> {
        let n = self.begin()?;
        Ok(envelope(
            vec![Ticker {
                symbol: "USD_JPY".to_string(),
                ask: format!("150.{n:03}"),
                bid: format!("149.{n:03}"),
                timestamp: "2024-03-14T01:00:00.000Z".to_string(),
                status: ExchangeStatus::Open,
            }],
            n,
        ))
    }

    pub async fn klines(&self, params: &KlineParams) -> anyhow::Result<KlineResponse> {
        let n = self.begin()?;
        Ok(envelope(
            vec![Kline {
                open_time: format!("{}-{n}", params.date),
                open: "149.500".to_string(),
                high: "150.100".to_string(),
                low: "149.200".to_string(),
                close: "149.900".to_string(),
            }],
            n,
        ))
    }

    pub async fn symbols(&self) -> anyhow::Result<SymbolResponse> {
        let n = self.begin()?;
        Ok(envelope(
            vec![SymbolRule {
                symbol: "USD_JPY".to_string(),
                min_open_order_size: "10000".to_string(),
                max_order_size: "500000".to_string(),
                size_step: "1".to_string(),
                tick_size: "0.001".to_string(),
            }],
            n,
        ))
    }
}

fn envelope<T>(data: T, n: usize) -> ApiResponse<T> {
    ApiResponse {
        status: 0,
        data,
        responsetime: format!("2024-03-14T01:00:00.{n:03}Z"),
    }
}
