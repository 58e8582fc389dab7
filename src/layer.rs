//! Market data cache facade
//!
//! Wires the memory store, the durable store and the placement policy into a
//! single read-through lookup. Upstream access stays with the caller: it
//! passes a fetch closure that is only awaited on a miss or a bypass.
//!
//! # Caching
//!
//! Live data (status, ticker) is held in memory for its domain TTL. Closed
//! trading days and instrument rules are written to disk and survive
//! restarts. Klines for the trading day still in progress are never cached.
//!
//! # Examples
//!
//! ```rust,ignore
//! use fxcache::{CacheConfig, CachingSignals, MarketDataCache, MarketDataRequest, TickerResponse};
//!
//! let cache = MarketDataCache::new(CacheConfig::default())?;
//! let signals = CachingSignals::from_request(&query, &headers);
//!
//! let cached = cache
//!     .get_or_fetch(&MarketDataRequest::Ticker, &signals, || async {
//!         client.get("/public/v1/ticker").send().await?.json::<TickerResponse>().await
//!     })
//!     .await?;
//!
//! for (name, value) in cached.provenance.headers() {
//!     response.insert_header(name, value);
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

use crate::cache::{spawn_sweeper, CacheKey, DiskStore, DurableStore, NoOpStore, TtlMemoryStore};
use crate::clock::{system_clock, Clock};
use crate::config::CacheConfig;
use crate::errors::CacheError;
use crate::market::MarketDataRequest;
use crate::policy::{
    CacheLookupPlan, CachePolicy, CacheProvenance, CachingSignals, Freshness, Placement, StoreKind,
};
use crate::tracing::spans;

/// A value together with the cache provenance to attach to the response
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub provenance: CacheProvenance,
}

/// Read-through cache for market data requests
///
/// Cheap to share behind an `Arc`; all stores are internally synchronized.
pub struct MarketDataCache {
    memory: Arc<TtlMemoryStore<Arc<Value>>>,
    durable: Arc<dyn DurableStore>,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for MarketDataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataCache")
            .field("memory_entries", &self.memory.size())
            .field("durable", &self.durable.name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl MarketDataCache {
    /// Creates a cache on the system clock
    ///
    /// With `persist` on, the cache directory is created and checked for
    /// writability up front; otherwise durable placements use a no-op store.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the cache directory cannot be created or
    /// written.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        Self::with_clock(config, system_clock())
    }

    /// Creates a cache reading time from `clock`
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        let durable: Arc<dyn DurableStore> = if config.persist {
            Arc::new(DiskStore::new(config.cache_dir.clone(), clock.clone()).validate()?)
        } else {
            Arc::new(NoOpStore)
        };
        Ok(Self::with_durable_store(config, clock, durable))
    }

    /// Creates a cache backed by a caller-supplied durable store
    pub fn with_durable_store(
        config: CacheConfig,
        clock: Arc<dyn Clock>,
        durable: Arc<dyn DurableStore>,
    ) -> Self {
        info!(
            durable = durable.name(),
            cache_dir = %config.cache_dir.display(),
            "Initialized market data cache"
        );
        Self {
            memory: Arc::new(TtlMemoryStore::new(clock.clone())),
            durable,
            policy: CachePolicy::new(config, clock.clone()),
            clock,
        }
    }

    pub fn memory(&self) -> &Arc<TtlMemoryStore<Arc<Value>>> {
        &self.memory
    }

    pub fn durable(&self) -> &Arc<dyn DurableStore> {
        &self.durable
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Starts the background memory sweeper at the configured interval
    pub fn spawn_sweeper(&self) -> JoinHandle<()> {
        spawn_sweeper(self.memory.clone(), self.policy.config().sweep_interval)
    }

    /// Returns the cached value for `request`, or fetches and caches it
    ///
    /// 1. Override signals or a running trading day: `fetch` is awaited and
    ///    nothing is read or written.
    /// 2. Otherwise the chosen store is checked and a hit returns at once.
    /// 3. On a miss `fetch` is awaited and the result is written back
    ///    best-effort before it is returned.
    ///
    /// # Errors
    ///
    /// Only the error returned by `fetch`, unchanged. Cache failures are
    /// logged and never surface here.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        request: &MarketDataRequest,
        signals: &CachingSignals,
        fetch: F,
    ) -> Result<Cached<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let plan = self.policy.plan(request, signals);
        let span = spans::get_or_fetch(plan.domain.as_str(), &plan.key, plan.placement.as_str());
        self.lookup(plan, fetch).instrument(span).await
    }

    async fn lookup<T, E, F, Fut>(&self, plan: CacheLookupPlan, fetch: F) -> Result<Cached<T>, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let CacheLookupPlan {
            key,
            placement,
            historical,
            ..
        } = plan;

        match placement {
            Placement::Bypass { reason } => {
                debug!(key = %key, reason = %reason, "Bypassing cache");
                let value = fetch().await?;
                Ok(Cached {
                    value,
                    provenance: CacheProvenance::bypass(historical),
                })
            }
            Placement::Memory { ttl } => {
                if let Some(value) = self.memory_hit::<T>(&key) {
                    let remaining = self.memory.remaining_ttl(&key).unwrap_or_default();
                    return Ok(Cached {
                        value,
                        provenance: CacheProvenance::hit(
                            StoreKind::Memory,
                            historical,
                            Freshness::Ttl(remaining),
                        ),
                    });
                }

                let value = fetch().await?;
                if let Some(encoded) = encode(&key, &value) {
                    self.memory.set(key, Arc::new(encoded), ttl);
                }
                Ok(Cached {
                    value,
                    provenance: CacheProvenance::miss(
                        StoreKind::Memory,
                        historical,
                        Freshness::Ttl(ttl),
                    ),
                })
            }
            Placement::Durable => {
                if let Some(value) = self.durable_hit::<T>(&key).await {
                    return Ok(Cached {
                        value,
                        provenance: CacheProvenance::hit(
                            StoreKind::Durable,
                            historical,
                            Freshness::Permanent,
                        ),
                    });
                }

                let value = fetch().await?;
                if let Some(encoded) = encode(&key, &value) {
                    // Best-effort: the store has already logged the failure
                    if let Err(e) = self.durable.set_value(&key, encoded).await {
                        debug!(key = %key, error = %e, "Failed to persist entry (continuing anyway)");
                    }
                }
                Ok(Cached {
                    value,
                    provenance: CacheProvenance::miss(
                        StoreKind::Durable,
                        historical,
                        Freshness::Permanent,
                    ),
                })
            }
        }
    }

    fn memory_hit<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        self.memory.get_with(key, |stored| {
            serde::Deserialize::deserialize(&**stored)
                .inspect_err(|e: &serde_json::Error| {
                    warn!(key = %key, error = %e, "Memory entry has unexpected shape, treating as miss");
                })
                .ok()
        })
    }

    async fn durable_hit<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let stored = self.durable.get_value(key).await?;
        match serde_json::from_value(stored) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Durable entry has unexpected shape, treating as miss");
                self.durable.record_rejected(key);
                None
            }
        }
    }
}

fn encode<T: Serialize>(key: &CacheKey, value: &T) -> Option<Value> {
    serde_json::to_value(value)
        .inspect_err(|e| warn!(key = %key, error = %e, "Failed to encode value for caching"))
        .ok()
}
