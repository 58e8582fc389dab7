//! Well-known constants
//!
//! Centralizes the fixed values the cache layer relies on: default TTLs, the
//! exchange's session boundary, domain tags and the provenance header names.

use std::time::Duration;

/// Default cache root for the durable store
pub const DEFAULT_CACHE_DIR: &str = "./cache";

/// Extension of durable entry files
pub const ENTRY_EXTENSION: &str = "json";

/// Default interval for the optional background sweeper
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Per-domain TTLs for live data held in the memory store
pub mod ttl {
    use std::time::Duration;

    /// Exchange status (open / close / maintenance)
    pub const STATUS: Duration = Duration::from_secs(30);

    /// Latest bid/ask rates
    pub const TICKER: Duration = Duration::from_secs(5);

    /// Instrument trading rules. Only applies when symbols are held in
    /// memory; by default they go to the durable store instead.
    pub const SYMBOLS: Duration = Duration::from_secs(3600);

    /// Any other domain
    pub const DEFAULT: Duration = Duration::from_secs(60);
}

/// Trading session boundary of the exchange
pub mod session {
    /// Fixed UTC offset of the exchange clock, in hours (JST)
    pub const UTC_OFFSET_HOURS: i32 = 9;

    /// Local hour at which a new trading day starts
    pub const ROLLOVER_HOUR: u32 = 6;
}

/// Domain tags used as the leading component of cache keys
pub mod domains {
    pub const STATUS: &str = "status";
    pub const TICKER: &str = "ticker";
    pub const KLINE: &str = "kline";
    pub const SYMBOLS: &str = "symbols";
}

/// Request signals and response headers used by the cache policy
pub mod headers {
    /// Query parameter; `false` disables caching
    pub const CACHE_PARAM: &str = "cache";

    /// Query parameter; `true` requests live data
    pub const REALTIME_PARAM: &str = "realtime";

    pub const CACHE_CONTROL: &str = "cache-control";

    /// Custom request header; `true` forces a refetch
    pub const FORCE_REFRESH: &str = "x-force-refresh";

    pub const X_CACHE: &str = "X-Cache";
    pub const X_CACHE_STORE: &str = "X-Cache-Store";
    pub const X_CACHE_HISTORICAL: &str = "X-Cache-Historical";
    pub const X_CACHE_TTL: &str = "X-Cache-TTL";
}
