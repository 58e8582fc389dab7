// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache stores for market data
//!
//! Two stores with opposite lifetimes:
//!
//! - [`TtlMemoryStore`]: in-process, every entry expires after its own TTL.
//!   Holds live data (status, ticker) that must never be served stale.
//! - [`DurableStore`] backends: entries never expire. Hold immutable data
//!   (closed trading days, instrument rules) across restarts.
//!   - [`DiskStore`]: one JSON file per key under a flat cache root (default)
//!   - [`NoOpStore`]: persistence disabled
//!
//! Both are keyed by [`CacheKey`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use fxcache::{CacheKey, DiskStore, DurableStoreExt, system_clock};
//!
//! let store = DiskStore::new("./cache", system_clock()).validate()?;
//! let key = DiskStore::kline_key("USD_JPY", "BID", "1min", "20240313");
//! store.set(&key, &klines).await.ok(); // best-effort
//! let cached: Option<Vec<Kline>> = store.get(&key).await;
//! ```

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::warn;

use crate::errors::CacheError;

mod disk;
mod key;
mod memory;
mod noop;
pub mod types;

pub use disk::DiskStore;
pub use key::{CacheDomain, CacheKey};
pub use memory::{spawn_sweeper, TtlMemoryStore};
pub use noop::NoOpStore;

/// Statistics about cache performance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits (successful retrievals)
    pub hits: u64,
    /// Number of cache misses (absent, expired, or unreadable)
    pub misses: u64,
    /// Number of entries dropped because their TTL elapsed
    pub expirations: u64,
    /// Number of writes that failed and were discarded
    pub write_failures: u64,
    /// Current number of entries in the store
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate as a percentage (0.0 to 100.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={}, misses={}, expirations={}, write_failures={}, entries={}, hit_rate={:.1}%",
            self.hits,
            self.misses,
            self.expirations,
            self.write_failures,
            self.entries,
            self.hit_rate()
        )
    }
}

/// Trait for durable (never-expiring) cache backends
///
/// Values cross the trait boundary as [`serde_json::Value`] so the trait
/// stays object-safe; [`DurableStoreExt`] adds typed `get`/`set`.
///
/// # Error Handling
///
/// Reads never fail: an absent, unreadable or corrupt entry is a miss.
/// Writes and deletes report failure in their `Result` so the caller can see
/// it, but callers are expected to log and continue. A durable store must
/// never be the reason a request fails.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Retrieves the value stored under `key`
    async fn get_value(&self, key: &CacheKey) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous entry
    async fn set_value(&self, key: &CacheKey, value: Value) -> Result<(), CacheError>;

    /// Checks whether an entry exists, without reading it
    async fn has(&self, key: &CacheKey) -> bool;

    /// Removes the entry under `key`; absent entries are not an error
    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError>;

    /// Removes every entry
    async fn clear(&self) -> Result<(), CacheError>;

    /// Returns current store statistics
    async fn stats(&self) -> CacheStats;

    /// Reclassifies the hit just returned for `key` as a miss
    ///
    /// Called when the caller could not decode the value `get_value` returned.
    /// Stores without statistics can ignore it.
    fn record_rejected(&self, _key: &CacheKey) {}

    /// Human-readable backend name, for logs and provenance
    fn name(&self) -> &'static str;
}

/// Typed access on top of any [`DurableStore`]
#[async_trait]
pub trait DurableStoreExt: DurableStore {
    /// Retrieves and deserializes the value under `key`
    ///
    /// A stored value of the wrong shape is treated as a miss.
    async fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: DeserializeOwned + Send,
    {
        let value = self.get_value(key).await?;
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(e) => {
                warn!(key = %key, error = %e, "Durable entry has unexpected shape, treating as miss");
                self.record_rejected(key);
                None
            }
        }
    }

    /// Serializes and stores `value` under `key`
    async fn set<T>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError>
    where
        T: Serialize + Sync,
    {
        let value = serde_json::to_value(value)
            .map_err(|e| CacheError::serialization(format!("Failed to encode {key}"), e))?;
        self.set_value(key, value).await
    }
}

impl<S: DurableStore + ?Sized> DurableStoreExt for S {}
