// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Disk-backed durable store: one JSON file per key

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn, Instrument};

use super::{types::TimestampMillis, CacheKey, CacheStats, DurableStore};
use crate::clock::Clock;
use crate::config::constants::ENTRY_EXTENSION;
use crate::errors::CacheError;
use crate::tracing::spans;

/// On-disk record
///
/// The full key is stored next to the value so a digest collision reads as a
/// miss instead of returning another key's data.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DurableRecord {
    value: Value,
    created_at: TimestampMillis,
    key: CacheKey,
}

/// Durable store writing each entry to `<root>/<sha256(key)>.json`
///
/// - Entries never expire; they are removed only by [`delete`](DurableStore::delete)
///   or [`clear`](DurableStore::clear)
/// - The root directory is created on first write if absent
/// - Writes go to a unique temp file that is renamed into place, so readers
///   never see a half-written entry
/// - Unreadable or corrupt entries are misses, never errors
///
/// Concurrent writers of the same key (in this process or another one sharing
/// the directory) race with last-write-wins semantics. Values for a given key
/// are expected to be identical, so the race is benign.
///
/// # Examples
///
/// ```rust,ignore
/// use fxcache::{DiskStore, DurableStoreExt, system_clock};
///
/// let store = DiskStore::new("/var/cache/fx", system_clock()).validate()?;
/// store.set(&DiskStore::symbols_key(), &rules).await.ok();
/// ```
#[derive(Debug)]
pub struct DiskStore {
    root: PathBuf,
    clock: Arc<dyn Clock>,
    stats: Mutex<CacheStats>,
    temp_seq: AtomicU64,
}

impl DiskStore {
    /// Creates a store rooted at `root`
    ///
    /// No I/O is performed; the directory is created lazily on first write.
    /// Use [`validate`](Self::validate) to create and check it up front.
    pub fn new(root: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            clock,
            stats: Mutex::new(CacheStats::default()),
            temp_seq: AtomicU64::new(0),
        }
    }

    /// Creates the root directory if needed and checks it is writable
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be created, is not a directory, or
    /// does not accept writes.
    pub fn validate(self) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&self.root).map_err(|e| {
            CacheError::cache_io(
                self.root.display().to_string(),
                format!("Failed to create cache directory: {e}"),
                e,
            )
        })?;

        if !self.root.is_dir() {
            return Err(CacheError::directory_unavailable(
                self.root.display().to_string(),
            ));
        }

        let probe = self.root.join(".cache_write_test");
        std::fs::write(&probe, b"test").map_err(|e| {
            CacheError::cache_io(
                self.root.display().to_string(),
                format!("Cache directory is not writable: {e}"),
                e,
            )
        })?;
        let _ = std::fs::remove_file(&probe);

        info!(path = %self.root.display(), "Durable cache directory ready");
        Ok(self)
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry file for `key`
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    /// Conventional key for a candlestick series
    pub fn kline_key(symbol: &str, price_type: &str, interval: &str, date: &str) -> CacheKey {
        CacheKey::kline(symbol, price_type, interval, date)
    }

    /// Conventional key for the instrument trading rules
    pub fn symbols_key() -> CacheKey {
        CacheKey::symbols()
    }

    fn stats_mut(&self) -> MutexGuard<'_, CacheStats> {
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_miss(&self) {
        self.stats_mut().misses += 1;
    }

    fn temp_path(&self, key: &CacheKey) -> PathBuf {
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            "{}.{}.{}.tmp",
            key.digest(),
            std::process::id(),
            seq
        ))
    }

    async fn read_record(&self, key: &CacheKey) -> Option<DurableRecord> {
        let path = self.entry_path(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key = %key, "Cache miss (disk)");
                return None;
            }
            Err(e) => {
                warn!(key = %key, path = %path.display(), error = %e, "Failed to read cache entry, treating as miss");
                return None;
            }
        };

        let record: DurableRecord = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, path = %path.display(), error = %e, "Corrupt cache entry, treating as miss");
                return None;
            }
        };

        if record.key != *key {
            warn!(
                key = %key,
                stored_key = %record.key,
                path = %path.display(),
                "Cache entry belongs to a different key, treating as miss"
            );
            return None;
        }

        Some(record)
    }

    async fn write_record(&self, key: &CacheKey, value: Value) -> Result<(), CacheError> {
        let record = DurableRecord {
            value,
            created_at: TimestampMillis::from_datetime(self.clock.now()),
            key: key.clone(),
        };
        let json = serde_json::to_vec_pretty(&record)
            .map_err(|e| CacheError::serialization(format!("Failed to encode {key}"), e))?;

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            CacheError::cache_io(
                self.root.display().to_string(),
                format!("Failed to create cache directory: {e}"),
                e,
            )
        })?;

        let path = self.entry_path(key);
        let temp = self.temp_path(key);

        if let Err(e) = tokio::fs::write(&temp, &json).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(CacheError::cache_io(
                temp.display().to_string(),
                format!("Failed to write cache entry: {e}"),
                e,
            ));
        }

        if let Err(e) = tokio::fs::rename(&temp, &path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(CacheError::cache_io(
                path.display().to_string(),
                format!("Failed to move cache entry into place: {e}"),
                e,
            ));
        }

        debug!(key = %key, path = %path.display(), bytes = json.len(), "Saved cache entry");
        Ok(())
    }

    async fn entry_files(&self) -> Result<Vec<PathBuf>, CacheError> {
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CacheError::cache_io(
                    self.root.display().to_string(),
                    format!("Failed to list cache directory: {e}"),
                    e,
                ))
            }
        };

        let mut files = Vec::new();
        loop {
            match dir.next_entry().await {
                Ok(Some(entry)) => {
                    let path = entry.path();
                    if path.extension().and_then(|ext| ext.to_str()) == Some(ENTRY_EXTENSION) {
                        files.push(path);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    return Err(CacheError::cache_io(
                        self.root.display().to_string(),
                        format!("Failed to list cache directory: {e}"),
                        e,
                    ))
                }
            }
        }
        Ok(files)
    }
}

#[async_trait]
impl DurableStore for DiskStore {
    async fn get_value(&self, key: &CacheKey) -> Option<Value> {
        match self.read_record(key).instrument(spans::durable_read(key)).await {
            Some(record) => {
                self.stats_mut().hits += 1;
                debug!(key = %key, "Cache hit (disk)");
                Some(record.value)
            }
            None => {
                self.record_miss();
                None
            }
        }
    }

    async fn set_value(&self, key: &CacheKey, value: Value) -> Result<(), CacheError> {
        self.write_record(key, value)
            .instrument(spans::durable_write(key))
            .await
            .inspect_err(|e| {
                self.stats_mut().write_failures += 1;
                warn!(key = %key, error = %e, "Failed to persist cache entry, continuing uncached");
            })
    }

    async fn has(&self, key: &CacheKey) -> bool {
        tokio::fs::try_exists(self.entry_path(key))
            .await
            .unwrap_or(false)
    }

    async fn delete(&self, key: &CacheKey) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key = %key, "Deleted cache entry");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to delete cache entry");
                Err(CacheError::cache_io(
                    path.display().to_string(),
                    format!("Failed to delete cache entry: {e}"),
                    e,
                ))
            }
        }
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let files = self.entry_files().await?;
        debug!(path = %self.root.display(), entries = files.len(), "Clearing disk store");

        for path in files {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(CacheError::cache_io(
                        path.display().to_string(),
                        format!("Failed to delete cache entry: {e}"),
                        e,
                    ))
                }
            }
        }
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        let entries = self.entry_files().await.map(|f| f.len()).unwrap_or(0);
        let mut stats = self.stats_mut();
        stats.entries = entries;
        stats.clone()
    }

    fn record_rejected(&self, key: &CacheKey) {
        let mut stats = self.stats_mut();
        stats.hits = stats.hits.saturating_sub(1);
        stats.misses += 1;
        debug!(key = %key, "Disk entry rejected by caller, counting as miss");
    }

    fn name(&self) -> &'static str {
        "disk"
    }
}
