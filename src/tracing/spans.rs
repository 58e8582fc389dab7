// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for fxcache operations.
//!
//! Telemetry is kept out of the business logic: each instrumented operation
//! has a span helper here, attached with [`tracing::Instrument`] so the span
//! follows the future across `.await` points.
//!
//! ```rust,ignore
//! self.read_record(key).instrument(spans::durable_read(key)).await
//! ```

use tracing::Span;

use crate::cache::CacheKey;
use crate::session::TradingDate;

/// Create span for a full cache lookup (policy decision, store check, fetch
/// on miss, write-back).
///
/// Parent: None (root span for this operation)
/// Children: durable_read, durable_write
#[inline]
pub(crate) fn get_or_fetch(domain: &str, key: &CacheKey, placement: &'static str) -> Span {
    tracing::info_span!(
        "fxcache.get_or_fetch",
        domain = domain,
        key = %key,
        placement = placement,
    )
}

/// Create span for reading one durable entry.
///
/// Parent: get_or_fetch span (if any)
#[inline]
pub(crate) fn durable_read(key: &CacheKey) -> Span {
    tracing::debug_span!("fxcache.durable_read", key = %key)
}

/// Create span for writing one durable entry.
///
/// Parent: get_or_fetch span (if any)
#[inline]
pub(crate) fn durable_write(key: &CacheKey) -> Span {
    tracing::debug_span!("fxcache.durable_write", key = %key)
}

/// Create span for classifying a trading date as historical or live.
///
/// Parent: get_or_fetch span (if any)
#[inline]
pub(crate) fn classify(date: &TradingDate) -> Span {
    tracing::debug_span!("fxcache.classify", date = %date)
}
