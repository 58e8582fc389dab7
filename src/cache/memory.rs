// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! In-memory TTL store for live data

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{types::TimestampMillis, CacheKey, CacheStats};
use crate::clock::Clock;

/// Entry in the memory store
#[derive(Debug, Clone)]
struct MemoryEntry<V> {
    value: V,
    created_at: TimestampMillis,
    ttl: Duration,
}

impl<V> MemoryEntry<V> {
    /// A zero TTL is expired from the moment it is written
    fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.ttl.is_zero() || self.created_at.is_older_than(self.ttl, now)
    }

    fn remaining(&self, now: chrono::DateTime<chrono::Utc>) -> Duration {
        self.ttl.saturating_sub(self.created_at.age_at(now))
    }
}

#[derive(Debug)]
struct MemoryStoreState<V> {
    entries: HashMap<CacheKey, MemoryEntry<V>>,
    stats: CacheStats,
}

impl<V> Default for MemoryStoreState<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }
}

/// In-memory store where every entry carries its own TTL
///
/// Expiry is lazy: `get` checks the entry's age against the shared clock and
/// drops it if the TTL has elapsed, so an expired value is never returned even
/// if [`sweep`](Self::sweep) has not run. `sweep` only bounds memory.
///
/// Values are returned by clone. For large payloads store an `Arc<T>` so a
/// hit is a reference-count bump; callers should treat hits as read-only.
///
/// # Examples
///
/// ```rust
/// use fxcache::{CacheKey, ManualClock, TtlMemoryStore};
/// use chrono::{TimeZone, Utc};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualClock::shared(Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap());
/// let store = TtlMemoryStore::new(clock.clone());
/// let key = CacheKey::build("ticker", Vec::<(&str, &str)>::new());
///
/// store.set(key.clone(), "rates", Duration::from_secs(5));
/// assert_eq!(store.get(&key), Some("rates"));
///
/// clock.advance(Duration::from_secs(6));
/// assert_eq!(store.get(&key), None);
/// assert_eq!(store.size(), 0);
/// ```
#[derive(Debug)]
pub struct TtlMemoryStore<V> {
    clock: Arc<dyn Clock>,
    state: Mutex<MemoryStoreState<V>>,
}

impl<V: Clone> TtlMemoryStore<V> {
    /// Creates an empty store reading time from `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(MemoryStoreState::default()),
        }
    }

    // A panic while holding the lock cannot leave the map half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, MemoryStoreState<V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `value` under `key`, replacing any existing entry
    pub fn set(&self, key: CacheKey, value: V, ttl: Duration) {
        let created_at = TimestampMillis::from_datetime(self.clock.now());
        let mut state = self.lock();

        debug!(key = %key, ttl_secs = ttl.as_secs(), "Inserting entry into memory store");
        state.entries.insert(
            key,
            MemoryEntry {
                value,
                created_at,
                ttl,
            },
        );
        state.stats.entries = state.entries.len();
    }

    /// Returns the value under `key` if present and not expired
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.get_with(key, |value| Some(value.clone()))
    }

    /// Looks up `key` and passes the live value to `decode`
    ///
    /// Counts a hit only if `decode` returns `Some`. A live entry that
    /// `decode` rejects counts as a miss and is left in place for the next
    /// `set` to overwrite. `decode` runs under the store lock.
    pub fn get_with<T, F>(&self, key: &CacheKey, decode: F) -> Option<T>
    where
        F: FnOnce(&V) -> Option<T>,
    {
        let now = self.clock.now();
        let mut state = self.lock();

        let expired = match state.entries.get(key) {
            None => {
                state.stats.misses += 1;
                debug!(key = %key, "Cache miss (memory)");
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            state.entries.remove(key);
            state.stats.expirations += 1;
            state.stats.misses += 1;
            state.stats.entries = state.entries.len();
            debug!(key = %key, "Cache entry expired");
            return None;
        }

        let decoded = state.entries.get(key).and_then(|entry| decode(&entry.value));
        if decoded.is_some() {
            state.stats.hits += 1;
            debug!(key = %key, "Cache hit (memory)");
        } else {
            state.stats.misses += 1;
            debug!(key = %key, "Memory entry rejected by caller, counting as miss");
        }
        decoded
    }

    /// Time left before the entry under `key` expires
    ///
    /// Returns `None` if there is no live entry. Does not count as a hit or
    /// miss and does not remove expired entries.
    pub fn remaining_ttl(&self, key: &CacheKey) -> Option<Duration> {
        let now = self.clock.now();
        let state = self.lock();
        state
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.remaining(now))
    }

    /// Removes every entry whose TTL has elapsed
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut state = self.lock();

        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - state.entries.len();

        state.stats.expirations += removed as u64;
        state.stats.entries = state.entries.len();

        if removed > 0 {
            info!(removed, remaining = state.entries.len(), "Swept expired memory entries");
        }
        removed
    }

    /// Removes the entry under `key`, if any
    pub fn remove(&self, key: &CacheKey) -> bool {
        let mut state = self.lock();
        let removed = state.entries.remove(key).is_some();
        state.stats.entries = state.entries.len();
        removed
    }

    /// Removes every entry
    pub fn clear(&self) {
        let mut state = self.lock();
        debug!(entries = state.entries.len(), "Clearing memory store");
        state.entries.clear();
        state.stats.entries = 0;
    }

    /// Number of entries currently held, expired or not
    pub fn size(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        self.lock().stats.clone()
    }
}

/// Spawns a task that calls [`TtlMemoryStore::sweep`] every `interval`
///
/// Optional: lazy expiry in `get` is enough for correctness, the sweeper only
/// keeps memory bounded when many keys are written once and never read again.
/// Abort the returned handle to stop it. Must be called inside a tokio runtime.
pub fn spawn_sweeper<V>(store: Arc<TtlMemoryStore<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            store.sweep();
        }
    })
}
