// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for cache metadata
//!
//! - [`TimestampMillis`]: Unix timestamp in milliseconds, taken from the
//!   shared [`Clock`](crate::Clock) rather than the system clock directly

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unix timestamp in milliseconds
///
/// Milliseconds keep TTL comparisons exact for the short live-data windows
/// (a 5 second ticker TTL must not be rounded to 4 or 6).
///
/// # Examples
///
/// ```
/// use fxcache::TimestampMillis;
/// use chrono::{TimeZone, Utc};
/// use std::time::Duration;
///
/// let created = Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap();
/// let ts = TimestampMillis::from_datetime(created);
/// let now = created + chrono::Duration::seconds(6);
/// assert_eq!(ts.age_at(now), Duration::from_secs(6));
/// assert!(ts.is_older_than(Duration::from_secs(5), now));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimestampMillis(i64);

impl TimestampMillis {
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis())
    }

    /// Creates a timestamp from a raw millisecond value
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    /// Age of this timestamp at `now`
    ///
    /// If this timestamp is in the future relative to `now`, returns zero.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        let age = now.timestamp_millis().saturating_sub(self.0);
        Duration::from_millis(u64::try_from(age).unwrap_or(0))
    }

    /// Checks if this timestamp is strictly older than `duration` at `now`
    pub fn is_older_than(&self, duration: Duration, now: DateTime<Utc>) -> bool {
        self.age_at(now) > duration
    }
}
