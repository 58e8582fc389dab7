// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache placement policy
//!
//! Decides, per logical request, whether the cache is used at all and which
//! store holds the result:
//!
//! | Request                       | Placement                  |
//! |-------------------------------|----------------------------|
//! | status, ticker, other domains | memory, domain TTL         |
//! | symbols                       | durable                    |
//! | klines, closed trading date   | durable                    |
//! | klines, running trading date  | bypass (never cached)      |
//! | any request with an override  | bypass                     |
//!
//! The policy never fetches anything itself; see
//! [`MarketDataCache`](crate::MarketDataCache) for the full lookup.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheDomain, CacheKey};
use crate::clock::Clock;
use crate::config::CacheConfig;
use crate::market::MarketDataRequest;
use crate::session::TradingCalendar;

mod provenance;
mod signals;

pub use provenance::{CacheProvenance, CacheStatus, Freshness};
pub use signals::{BypassReason, CachingSignals};

/// Which store a response is served from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Memory,
    Durable,
}

impl StoreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Memory => "memory",
            StoreKind::Durable => "durable",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a request's result is looked up and stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Memory store, expiring after `ttl`
    Memory { ttl: Duration },
    /// Durable store, never expiring
    Durable,
    /// Not cached anywhere
    Bypass { reason: BypassReason },
}

impl Placement {
    pub fn store(&self) -> Option<StoreKind> {
        match self {
            Placement::Memory { .. } => Some(StoreKind::Memory),
            Placement::Durable => Some(StoreKind::Durable),
            Placement::Bypass { .. } => None,
        }
    }

    /// Short label for spans and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Memory { .. } => "memory",
            Placement::Durable => "durable",
            Placement::Bypass { .. } => "bypass",
        }
    }
}

/// The policy's decision for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLookupPlan {
    pub key: CacheKey,
    pub domain: CacheDomain,
    pub placement: Placement,
    /// Historical classification, only for date-bearing requests (klines)
    pub historical: Option<bool>,
}

/// Placement rules plus the trading calendar they depend on
///
/// # Examples
///
/// ```rust
/// use fxcache::{CacheConfig, CachePolicy, CachingSignals, ManualClock, MarketDataRequest, Placement};
/// use chrono::{TimeZone, Utc};
/// use std::time::Duration;
///
/// // 2024-03-14 10:00 JST
/// let clock = ManualClock::shared(Utc.with_ymd_and_hms(2024, 3, 14, 1, 0, 0).unwrap());
/// let policy = CachePolicy::new(CacheConfig::default(), clock);
///
/// let plan = policy.resolve(&MarketDataRequest::Ticker);
/// assert_eq!(plan.placement, Placement::Memory { ttl: Duration::from_secs(5) });
///
/// let closed = MarketDataRequest::from_parts(
///     "klines",
///     [("symbol", "USD_JPY"), ("priceType", "BID"), ("interval", "1min"), ("date", "20240313")],
/// )
/// .unwrap();
/// assert_eq!(policy.resolve(&closed).placement, Placement::Durable);
/// assert_eq!(policy.resolve(&closed).historical, Some(true));
///
/// let signals = CachingSignals::from_request([("realtime", "true")], Vec::<(&str, &str)>::new());
/// assert!(matches!(policy.plan(&closed, &signals).placement, Placement::Bypass { .. }));
/// ```
#[derive(Debug, Clone)]
pub struct CachePolicy {
    config: CacheConfig,
    calendar: TradingCalendar,
}

impl CachePolicy {
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let calendar = TradingCalendar::new(config.session, clock);
        Self { config, calendar }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn calendar(&self) -> &TradingCalendar {
        &self.calendar
    }

    /// Whether the request's override signals leave caching on
    pub fn caching_allowed(&self, signals: &CachingSignals) -> bool {
        signals.allows_caching()
    }

    /// TTL for memory placements in `domain`
    pub fn ttl_for(&self, domain: &CacheDomain) -> Duration {
        self.config.ttl_for(domain)
    }

    /// Placement for `request`, ignoring override signals
    pub fn resolve(&self, request: &MarketDataRequest) -> CacheLookupPlan {
        let key = request.cache_key();
        let domain = request.domain();

        let (placement, historical) = match request {
            MarketDataRequest::Klines(params) => {
                let historical = self.calendar.is_historical_str(&params.date);
                let placement = if historical {
                    Placement::Durable
                } else {
                    Placement::Bypass {
                        reason: BypassReason::LiveSession,
                    }
                };
                (placement, Some(historical))
            }
            MarketDataRequest::Symbols => (Placement::Durable, None),
            MarketDataRequest::Status
            | MarketDataRequest::Ticker
            | MarketDataRequest::Other { .. } => (
                Placement::Memory {
                    ttl: self.ttl_for(&domain),
                },
                None,
            ),
        };

        debug!(key = %key, placement = placement.as_str(), ?historical, "Resolved cache placement");
        CacheLookupPlan {
            key,
            domain,
            placement,
            historical,
        }
    }

    /// Placement for `request` with its override signals applied
    ///
    /// An override turns any placement into a bypass. The historical
    /// classification is still reported.
    pub fn plan(&self, request: &MarketDataRequest, signals: &CachingSignals) -> CacheLookupPlan {
        let mut plan = self.resolve(request);
        if let Some(reason) = signals.bypass_reason() {
            debug!(key = %plan.key, reason = %reason, "Caching disabled by request");
            plan.placement = Placement::Bypass { reason };
        }
        plan
    }
}
