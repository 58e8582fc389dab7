// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the fxcache library.
//!
//! This module follows a hybrid approach:
//!
//! - **Module-specific errors** for fine-grained handling ([`CacheError`],
//!   [`TradingDateError`], [`RequestError`])
//! - **Unified error type** ([`FxCacheError`]) for callers that do not need to
//!   distinguish between sources
//!
//! Cache-infrastructure errors never leave the lookup path:
//! [`MarketDataCache::get_or_fetch`](crate::MarketDataCache::get_or_fetch)
//! only ever returns the caller's own fetch error. A broken disk or a corrupt
//! entry shows up as a miss and a `warn!` log line, never as a failed request.
//!
//! # Examples
//!
//! ```rust,ignore
//! use fxcache::{FxCacheError, KlineParams, MarketDataCache, CacheConfig};
//!
//! async fn example() -> Result<(), FxCacheError> {
//!     let cache = MarketDataCache::new(CacheConfig::default())?;
//!     let params = KlineParams::new("USD_JPY", "BID", "1min", "20240313")?;
//!     // Both error types convert into FxCacheError via `?`
//!     Ok(())
//! }
//! ```

mod cache;
mod request;
mod session;

pub use cache::CacheError;
pub use request::RequestError;
pub use session::TradingDateError;

/// Unified error type for all fxcache operations.
#[derive(Debug, thiserror::Error)]
pub enum FxCacheError {
    /// Error from the cache stores.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Error parsing a trading date.
    #[error("Trading date error: {0}")]
    Date(#[from] TradingDateError),

    /// Error building a logical market-data request.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_error_lists_missing_parameters() {
        let err = RequestError::missing(vec!["symbol", "date"]);
        assert_eq!(err.to_string(), "Missing required parameters: symbol, date");
    }

    #[test]
    fn test_unified_error_from_module_errors() {
        let err: FxCacheError = TradingDateError::invalid_shape("2024-03-14").into();
        assert!(matches!(err, FxCacheError::Date(_)));
        assert!(err.to_string().contains("2024-03-14"));

        let err: FxCacheError = RequestError::invalid_price_type("MID").into();
        assert!(matches!(err, FxCacheError::Request(_)));
    }

    #[test]
    fn test_cache_io_error_keeps_source() {
        use std::error::Error;

        let err = CacheError::cache_io(
            "/tmp/x.json",
            "write failed",
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Cache I/O error at /tmp/x.json: write failed");
    }
}
