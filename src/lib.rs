// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Caching layer for an FX market-data gateway
//!
//! Sits between request handlers and the upstream exchange API and decides,
//! per request, whether a response may be served from cache and from which
//! store:
//!
//! - Live data (exchange status, ticker) lives in an in-memory
//!   [`TtlMemoryStore`] for a short per-domain TTL.
//! - Immutable data (klines of closed trading days, symbol rules) is written
//!   to a [`DiskStore`] and survives restarts.
//! - Klines for the trading day still in progress are never cached. The
//!   trading day rolls over at 06:00 JST, see [`TradingCalendar`].
//!
//! Callers can opt out per request through [`CachingSignals`], and every
//! response carries a [`CacheProvenance`] that renders as `X-Cache*`
//! headers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fxcache::{CacheConfig, CachingSignals, MarketDataCache, MarketDataRequest};
//!
//! let cache = MarketDataCache::new(CacheConfig::default())?;
//! let request = MarketDataRequest::from_parts("klines", &query)?;
//! let signals = CachingSignals::from_request(&query, &headers);
//!
//! let cached = cache.get_or_fetch(&request, &signals, || upstream.klines(&request)).await?;
//! ```
//!
//! # Errors
//!
//! Each module has its own error type (see [`errors`]); [`FxCacheError`]
//! unifies them. Cache I/O failures are logged and swallowed inside the
//! lookup, so the only error [`MarketDataCache::get_or_fetch`] returns is the
//! caller's own fetch error.

pub mod cache;
pub mod clock;
pub mod config;
pub mod errors;
mod layer;
pub mod market;
pub mod policy;
pub mod session;
mod tracing;

pub use cache::types::TimestampMillis;
pub use cache::{
    spawn_sweeper, CacheDomain, CacheKey, CacheStats, DiskStore, DurableStore, DurableStoreExt,
    NoOpStore, TtlMemoryStore,
};
pub use clock::{system_clock, Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, CacheConfigBuilder, SessionConfig};
pub use errors::{CacheError, FxCacheError, RequestError, TradingDateError};
pub use layer::{Cached, MarketDataCache};
pub use market::*;
pub use policy::{
    BypassReason, CacheLookupPlan, CachePolicy, CacheProvenance, CacheStatus, CachingSignals,
    Freshness, Placement, StoreKind,
};
pub use session::{TradingCalendar, TradingDate};
