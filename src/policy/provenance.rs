// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache provenance attached to every response

use std::time::Duration;

use super::StoreKind;
use crate::config::constants::headers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    Bypass,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
            CacheStatus::Bypass => "BYPASS",
        }
    }
}

/// How long the served value stays valid in its store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Expires after this much time
    Ttl(Duration),
    /// Never expires (durable store)
    Permanent,
    /// Not cached
    None,
}

/// Where a response came from
///
/// # Examples
///
/// ```rust
/// use fxcache::{CacheProvenance, CacheStatus, Freshness, StoreKind};
/// use std::time::Duration;
///
/// let provenance = CacheProvenance {
///     status: CacheStatus::Hit,
///     store: Some(StoreKind::Memory),
///     historical: None,
///     freshness: Freshness::Ttl(Duration::from_secs(3)),
/// };
/// assert_eq!(
///     provenance.headers(),
///     vec![
///         ("X-Cache", "HIT".to_string()),
///         ("X-Cache-Store", "memory".to_string()),
///         ("X-Cache-TTL", "3".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheProvenance {
    pub status: CacheStatus,
    pub store: Option<StoreKind>,
    pub historical: Option<bool>,
    pub freshness: Freshness,
}

impl CacheProvenance {
    pub fn hit(store: StoreKind, historical: Option<bool>, freshness: Freshness) -> Self {
        Self {
            status: CacheStatus::Hit,
            store: Some(store),
            historical,
            freshness,
        }
    }

    pub fn miss(store: StoreKind, historical: Option<bool>, freshness: Freshness) -> Self {
        Self {
            status: CacheStatus::Miss,
            store: Some(store),
            historical,
            freshness,
        }
    }

    pub fn bypass(historical: Option<bool>) -> Self {
        Self {
            status: CacheStatus::Bypass,
            store: None,
            historical,
            freshness: Freshness::None,
        }
    }

    pub fn is_hit(&self) -> bool {
        self.status == CacheStatus::Hit
    }

    /// Response header pairs describing this provenance
    ///
    /// `X-Cache` is always present. The store, historical flag and TTL are
    /// only emitted when known. TTL is whole seconds, rounded up so a live
    /// entry never advertises `0`, or `permanent` for durable entries.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut out = vec![(headers::X_CACHE, self.status.as_str().to_string())];

        if let Some(store) = self.store {
            out.push((headers::X_CACHE_STORE, store.as_str().to_string()));
        }
        if let Some(historical) = self.historical {
            out.push((headers::X_CACHE_HISTORICAL, historical.to_string()));
        }
        match self.freshness {
            Freshness::Ttl(ttl) => {
                let secs = ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0);
                out.push((headers::X_CACHE_TTL, secs.to_string()));
            }
            Freshness::Permanent => out.push((headers::X_CACHE_TTL, "permanent".to_string())),
            Freshness::None => {}
        }

        out
    }
}
