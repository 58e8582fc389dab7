// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Trading-day boundary and historical-date classification

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use std::sync::Arc;
use tracing::debug;

use super::TradingDate;
use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::tracing::spans;

/// The exchange's trading calendar
///
/// A trading day does not end at UTC midnight. It runs from
/// `rollover_hour:00` local time (in a fixed UTC offset) on one calendar date
/// to just before `rollover_hour:00` on the next, and is labelled with the
/// first of the two dates. With the defaults (UTC+9, 06:00):
///
/// | instant (JST)        | trading day |
/// |----------------------|-------------|
/// | 2024-03-15 02:00     | 2024-03-14  |
/// | 2024-03-15 05:59:59  | 2024-03-14  |
/// | 2024-03-15 06:00     | 2024-03-15  |
///
/// A date is *historical* when it lies strictly before the current trading
/// day. Historical data can no longer change and may be cached forever.
/// Data for the current trading day is still live and must never be.
///
/// # Examples
///
/// ```rust
/// use fxcache::{ManualClock, SessionConfig, TradingCalendar, TradingDate};
/// use chrono::{TimeZone, Utc};
///
/// // 2024-03-15 02:00 JST
/// let clock = ManualClock::shared(Utc.with_ymd_and_hms(2024, 3, 14, 17, 0, 0).unwrap());
/// let calendar = TradingCalendar::new(SessionConfig::default(), clock);
///
/// assert!(!calendar.is_historical_str("20240314")); // still today's session
/// assert!(calendar.is_historical_str("20240313"));
/// assert!(!calendar.is_historical_str("2024"));
/// assert!(calendar.is_historical_str("2023"));
/// ```
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    utc_offset: TimeDelta,
    rollover_hour: u32,
    clock: Arc<dyn Clock>,
}

impl TradingCalendar {
    pub fn new(session: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            utc_offset: TimeDelta::hours(i64::from(session.utc_offset_hours)),
            rollover_hour: session.rollover_hour.min(23),
            clock,
        }
    }

    /// Wall-clock time at the exchange for the UTC instant `now`
    pub fn session_time(&self, now: DateTime<Utc>) -> NaiveDateTime {
        let utc = now.naive_utc();
        utc.checked_add_signed(self.utc_offset).unwrap_or(utc)
    }

    /// Trading day in progress at `now`
    pub fn trading_day_at(&self, now: DateTime<Utc>) -> NaiveDate {
        let local = self.session_time(now);
        let date = local.date();
        if local.hour() < self.rollover_hour {
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }

    /// Trading day in progress now
    pub fn trading_day(&self) -> NaiveDate {
        self.trading_day_at(self.clock.now())
    }

    /// Whether `date` lies strictly before the trading day in progress at `now`
    ///
    /// - A day is historical iff it is on or before the day before the
    ///   current trading day. The current trading day itself never is.
    /// - A year is historical iff it is strictly before the current trading
    ///   day's year, so the running year is never historical even once most
    ///   of it has closed.
    pub fn is_historical_at(&self, date: &TradingDate, now: DateTime<Utc>) -> bool {
        let _guard = spans::classify(date).entered();
        let today = self.trading_day_at(now);
        let historical = match date {
            TradingDate::Day(day) => *day < today,
            TradingDate::Year(year) => *year < today.year(),
        };
        debug!(date = %date, trading_day = %today, historical, "Classified trading date");
        historical
    }

    /// Whether `date` lies strictly before the current trading day
    pub fn is_historical(&self, date: &TradingDate) -> bool {
        self.is_historical_at(date, self.clock.now())
    }

    /// Classifies a raw `YYYY` / `YYYYMMDD` string at `now`
    ///
    /// Anything that does not parse is not historical: a malformed key must
    /// never end up in the durable store.
    pub fn is_historical_str_at(&self, raw: &str, now: DateTime<Utc>) -> bool {
        match raw.parse::<TradingDate>() {
            Ok(date) => self.is_historical_at(&date, now),
            Err(e) => {
                debug!(input = raw, error = %e, "Unparseable trading date, not historical");
                false
            }
        }
    }

    /// Classifies a raw `YYYY` / `YYYYMMDD` string against the current time
    pub fn is_historical_str(&self, raw: &str) -> bool {
        self.is_historical_str_at(raw, self.clock.now())
    }
}
