// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache key derivation
//!
//! Keys are plain strings built from a domain tag plus the request parameters
//! sorted by name, so the same logical request always yields the same key,
//! in this process and in the next one (durable keys outlive restarts).
//! The durable store additionally maps each key through SHA-256 to get a
//! fixed-length, filesystem-safe entry name.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use url::form_urlencoded;

use crate::config::constants::{domains, ENTRY_EXTENSION};

/// Logical data domain of a cached value
///
/// The domain picks the TTL for memory placements and is the leading
/// component of every cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CacheDomain {
    /// Exchange status
    Status,
    /// Latest rates
    Ticker,
    /// Candlestick series
    Kline,
    /// Instrument trading rules
    Symbols,
    /// Any other endpoint
    Other(String),
}

impl CacheDomain {
    pub fn as_str(&self) -> &str {
        match self {
            CacheDomain::Status => domains::STATUS,
            CacheDomain::Ticker => domains::TICKER,
            CacheDomain::Kline => domains::KLINE,
            CacheDomain::Symbols => domains::SYMBOLS,
            CacheDomain::Other(name) => name,
        }
    }
}

impl From<&str> for CacheDomain {
    fn from(name: &str) -> Self {
        match name {
            domains::STATUS => CacheDomain::Status,
            domains::TICKER => CacheDomain::Ticker,
            domains::KLINE => CacheDomain::Kline,
            domains::SYMBOLS => CacheDomain::Symbols,
            other => CacheDomain::Other(other.to_string()),
        }
    }
}

impl From<String> for CacheDomain {
    fn from(name: String) -> Self {
        CacheDomain::from(name.as_str())
    }
}

impl From<CacheDomain> for String {
    fn from(domain: CacheDomain) -> Self {
        domain.as_str().to_string()
    }
}

impl fmt::Display for CacheDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic cache key
///
/// # Examples
///
/// ```rust
/// use fxcache::CacheKey;
///
/// let a = CacheKey::build("ticker", [("symbol", "USD_JPY"), ("side", "BID")]);
/// let b = CacheKey::build("ticker", [("side", "BID"), ("symbol", "USD_JPY")]);
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "ticker_side=BID&symbol=USD_JPY");
///
/// let bare = CacheKey::build("status", Vec::<(&str, &str)>::new());
/// assert_eq!(bare.as_str(), "status");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Builds a key from a domain tag and a parameter set
    ///
    /// Returns the domain unchanged when there are no parameters. Otherwise the
    /// parameters are sorted by name (then value, so duplicate names are stable
    /// too), form-urlencoded, and appended as `<domain>_<encoded>`.
    pub fn build<I, K, V>(domain: impl AsRef<str>, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        if pairs.is_empty() {
            return Self(domain.as_ref().to_string());
        }

        pairs.sort();

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .finish();

        Self(format!("{}_{}", domain.as_ref(), encoded))
    }

    /// Key for a day (or year) of candlesticks
    ///
    /// ```rust
    /// use fxcache::CacheKey;
    ///
    /// let key = CacheKey::kline("USD_JPY", "BID", "1min", "20240313");
    /// assert_eq!(key.as_str(), "kline_USD_JPY_BID_1min_20240313");
    /// ```
    pub fn kline(symbol: &str, price_type: &str, interval: &str, date: &str) -> Self {
        Self(format!(
            "{}_{}_{}_{}_{}",
            domains::KLINE,
            symbol,
            price_type,
            interval,
            date
        ))
    }

    /// Key for the instrument trading rules
    pub fn symbols() -> Self {
        Self(domains::SYMBOLS.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fixed-length hex digest of the key
    ///
    /// Used only to name durable entries. Lookups still compare the full key
    /// stored inside the entry.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }

    /// File name of the durable entry for this key
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.digest(), ENTRY_EXTENSION)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
