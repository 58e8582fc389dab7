//! Configuration for fxcache
//!
//! Controls where the durable store lives, how long live data stays in the
//! memory store, and where the exchange's trading day begins.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use fxcache::CacheConfig;
//!
//! // ./cache, status 30s, ticker 5s, symbols 1h, everything else 60s
//! let config = CacheConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use fxcache::{CacheConfigBuilder, CacheDomain};
//! use std::time::Duration;
//!
//! let config = CacheConfigBuilder::with_defaults()
//!     .cache_dir("/var/cache/fx")
//!     .domain_ttl(CacheDomain::Ticker, Duration::from_secs(2))
//!     .build();
//! assert_eq!(config.ttl_for(&CacheDomain::Ticker), Duration::from_secs(2));
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheDomain;

pub mod constants;

/// Configuration for the cache layer
///
/// Use [`CacheConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Root directory of the durable store
    /// Default: `./cache`
    pub cache_dir: PathBuf,

    /// Whether historical data is persisted at all. When `false` the durable
    /// store is replaced by a no-op store and durable placements always miss.
    /// Default: true
    pub persist: bool,

    /// TTL for domains without an override
    /// Default: 60 seconds
    pub default_ttl: Duration,

    /// Per-domain TTL overrides
    pub domain_ttls: HashMap<CacheDomain, Duration>,

    /// Trading session boundary
    pub session: SessionConfig,

    /// Interval for [`spawn_sweeper`](crate::spawn_sweeper)
    /// Default: 60 seconds
    pub sweep_interval: Duration,
}

/// Where the exchange's trading day begins
///
/// The trading day does not roll over at UTC midnight but at a fixed local
/// hour in a fixed UTC offset. With the defaults (UTC+9, 06:00) the session
/// labelled 2024-03-14 runs from 2024-03-14 06:00 to 2024-03-15 05:59 JST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed offset of the exchange clock from UTC, in hours
    pub utc_offset_hours: i32,

    /// Local hour (0-23) at which the next trading day begins
    pub rollover_hour: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: constants::session::UTC_OFFSET_HOURS,
            rollover_hour: constants::session::ROLLOVER_HOUR,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::with_common_defaults()
    }
}

impl CacheConfig {
    /// Create config with the exchange's standard TTL table
    ///
    /// # Example
    ///
    /// ```rust
    /// use fxcache::{CacheConfig, CacheDomain};
    /// use std::time::Duration;
    ///
    /// let config = CacheConfig::with_common_defaults();
    /// assert_eq!(config.ttl_for(&CacheDomain::Status), Duration::from_secs(30));
    /// assert_eq!(config.ttl_for(&CacheDomain::Ticker), Duration::from_secs(5));
    /// assert_eq!(config.ttl_for(&CacheDomain::Symbols), Duration::from_secs(3600));
    /// ```
    pub fn with_common_defaults() -> Self {
        let mut config = Self::minimal();
        config.set_domain_ttl(CacheDomain::Status, constants::ttl::STATUS);
        config.set_domain_ttl(CacheDomain::Ticker, constants::ttl::TICKER);
        config.set_domain_ttl(CacheDomain::Symbols, constants::ttl::SYMBOLS);
        config
    }

    /// Create config with no per-domain overrides
    ///
    /// Every domain uses the 60 second default TTL.
    pub fn minimal() -> Self {
        Self {
            cache_dir: PathBuf::from(constants::DEFAULT_CACHE_DIR),
            persist: true,
            default_ttl: constants::ttl::DEFAULT,
            domain_ttls: HashMap::new(),
            session: SessionConfig::default(),
            sweep_interval: constants::DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Get the effective TTL for a domain
    ///
    /// Returns the domain override if set, otherwise the global default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fxcache::{CacheConfig, CacheDomain};
    /// use std::time::Duration;
    ///
    /// let config = CacheConfig::default();
    /// let other = CacheDomain::from("orders");
    /// assert_eq!(config.ttl_for(&other), Duration::from_secs(60));
    /// ```
    pub fn ttl_for(&self, domain: &CacheDomain) -> Duration {
        self.domain_ttls
            .get(domain)
            .copied()
            .unwrap_or(self.default_ttl)
    }

    /// Set a per-domain TTL override
    pub fn set_domain_ttl(&mut self, domain: CacheDomain, ttl: Duration) {
        self.domain_ttls.insert(domain, ttl);
    }
}

/// Builder for [`CacheConfig`]
///
/// # Example
///
/// ```rust
/// use fxcache::CacheConfigBuilder;
/// use std::time::Duration;
///
/// let config = CacheConfigBuilder::new()
///     .default_ttl(Duration::from_secs(10))
///     .persist(false)
///     .build();
/// assert!(!config.persist);
/// ```
pub struct CacheConfigBuilder {
    config: CacheConfig,
}

impl Default for CacheConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheConfigBuilder {
    /// Create a new builder with minimal defaults
    pub fn new() -> Self {
        Self {
            config: CacheConfig::minimal(),
        }
    }

    /// Start with the standard TTL table
    pub fn with_defaults() -> Self {
        Self {
            config: CacheConfig::with_common_defaults(),
        }
    }

    /// Set the durable store root
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.cache_dir = dir.into();
        self
    }

    /// Enable or disable the durable store
    pub fn persist(mut self, persist: bool) -> Self {
        self.config.persist = persist;
        self
    }

    /// Set the TTL used by domains without an override
    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = ttl;
        self
    }

    /// Override the TTL of a single domain
    pub fn domain_ttl(mut self, domain: CacheDomain, ttl: Duration) -> Self {
        self.config.set_domain_ttl(domain, ttl);
        self
    }

    /// Set the trading session boundary
    ///
    /// `rollover_hour` values above 23 are clamped to 23.
    pub fn session(mut self, utc_offset_hours: i32, rollover_hour: u32) -> Self {
        self.config.session = SessionConfig {
            utc_offset_hours,
            rollover_hour: rollover_hour.min(23),
        };
        self
    }

    /// Set the background sweep interval
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    /// Build the configuration
    pub fn build(self) -> CacheConfig {
        self.config
    }
}
