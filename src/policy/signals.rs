// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-request caching overrides

use std::fmt;

use crate::config::constants::headers;

/// Why a request does not use the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BypassReason {
    /// `cache=false` query parameter
    CacheDisabled,
    /// `realtime=true` query parameter
    Realtime,
    /// `Cache-Control: no-cache` or `no-store`
    CacheControl,
    /// `X-Force-Refresh: true`
    ForceRefresh,
    /// The requested date belongs to the trading day still in progress
    LiveSession,
}

impl BypassReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            BypassReason::CacheDisabled => "cache-disabled",
            BypassReason::Realtime => "realtime",
            BypassReason::CacheControl => "cache-control",
            BypassReason::ForceRefresh => "force-refresh",
            BypassReason::LiveSession => "live-session",
        }
    }
}

impl fmt::Display for BypassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four independent caching overrides a request can carry
///
/// Caching is available unless at least one signal asks to bypass it. With no
/// signals at all the request is cacheable.
///
/// # Examples
///
/// ```rust
/// use fxcache::{BypassReason, CachingSignals};
///
/// let signals = CachingSignals::from_request(
///     [("symbol", "USD_JPY")],
///     [("Cache-Control", "max-age=0, no-cache")],
/// );
/// assert!(!signals.allows_caching());
/// assert_eq!(signals.bypass_reason(), Some(BypassReason::CacheControl));
///
/// assert!(CachingSignals::default().allows_caching());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachingSignals {
    /// Value of the `cache` query parameter
    pub cache_param: Option<String>,
    /// Value of the `realtime` query parameter
    pub realtime_param: Option<String>,
    /// Value of the `Cache-Control` request header
    pub cache_control: Option<String>,
    /// Value of the `X-Force-Refresh` request header
    pub force_refresh: Option<String>,
}

impl CachingSignals {
    /// Extracts the signals from raw query pairs and header pairs
    ///
    /// Query names are matched exactly, header names case-insensitively.
    /// Repeated `Cache-Control` lines are joined with `", "` as one field
    /// value. For any other repeated name the first occurrence wins.
    pub fn from_request<Q, QK, QV, H, HK, HV>(query: Q, header_pairs: H) -> Self
    where
        Q: IntoIterator<Item = (QK, QV)>,
        QK: AsRef<str>,
        QV: AsRef<str>,
        H: IntoIterator<Item = (HK, HV)>,
        HK: AsRef<str>,
        HV: AsRef<str>,
    {
        let mut signals = Self::default();

        for (name, value) in query {
            let slot = match name.as_ref() {
                headers::CACHE_PARAM => &mut signals.cache_param,
                headers::REALTIME_PARAM => &mut signals.realtime_param,
                _ => continue,
            };
            slot.get_or_insert_with(|| value.as_ref().to_string());
        }

        for (name, value) in header_pairs {
            let name = name.as_ref();
            let value = value.as_ref();
            if name.eq_ignore_ascii_case(headers::CACHE_CONTROL) {
                let joined = signals.cache_control.get_or_insert_with(String::new);
                if !joined.is_empty() {
                    joined.push_str(", ");
                }
                joined.push_str(value);
            } else if name.eq_ignore_ascii_case(headers::FORCE_REFRESH) {
                signals
                    .force_refresh
                    .get_or_insert_with(|| value.to_string());
            }
        }

        signals
    }

    /// The first signal (in precedence order) that disables caching, if any
    pub fn bypass_reason(&self) -> Option<BypassReason> {
        if self.cache_param.as_deref() == Some("false") {
            return Some(BypassReason::CacheDisabled);
        }
        if self.realtime_param.as_deref() == Some("true") {
            return Some(BypassReason::Realtime);
        }
        if let Some(cache_control) = &self.cache_control {
            let cache_control = cache_control.to_ascii_lowercase();
            if cache_control.contains("no-cache") || cache_control.contains("no-store") {
                return Some(BypassReason::CacheControl);
            }
        }
        if self.force_refresh.as_deref() == Some("true") {
            return Some(BypassReason::ForceRefresh);
        }
        None
    }

    /// Whether this request may read from and write to the cache
    pub fn allows_caching(&self) -> bool {
        self.bypass_reason().is_none()
    }
}
