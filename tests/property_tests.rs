// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for key derivation, trading-day classification and
//! memory expiry
//!
//! These tests use proptest to validate invariants across a wide range of
//! parameters, dates and clock positions.

mod helpers;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, TimeDelta};
use fxcache::{
    CacheKey, ManualClock, SessionConfig, TradingCalendar, TradingDate, TtlMemoryStore,
};
use helpers::jst;
use proptest::prelude::*;

// Dates between 2000-01-01 and roughly 2054
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..20_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + TimeDelta::days(offset)
    })
}

fn arb_params() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-zA-Z]{1,8}", "[ -~]{0,12}", 0..6)
        .prop_map(|map: BTreeMap<String, String>| map.into_iter().collect())
}

fn calendar_at(date: NaiveDate, hour: u32, minute: u32) -> TradingCalendar {
    let clock = ManualClock::shared(jst(date.year(), date.month(), date.day(), hour, minute));
    TradingCalendar::new(SessionConfig::default(), clock)
}

proptest! {
    /// Property: parameter order never changes the key
    #[test]
    fn prop_key_independent_of_param_order(
        (params, shuffled) in arb_params().prop_flat_map(|params| {
            let shuffled = Just(params.clone()).prop_shuffle();
            (Just(params), shuffled)
        }),
    ) {
        let a = CacheKey::build("ticker", params.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let b = CacheKey::build("ticker", shuffled.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        prop_assert_eq!(a.digest(), b.digest());
        prop_assert_eq!(a, b);
    }

    /// Property: different domains never share a key
    #[test]
    fn prop_domain_separates_keys(params in arb_params()) {
        let pairs = || params.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        prop_assert_ne!(CacheKey::build("ticker", pairs()), CacheKey::build("status", pairs()));
    }

    /// Property: the trading day is the JST date, minus one before 06:00
    #[test]
    fn prop_trading_day_rolls_at_six(date in arb_date(), hour in 0u32..24, minute in 0u32..60) {
        let calendar = calendar_at(date, hour, minute);
        let expected = if hour < 6 { date.pred_opt().unwrap() } else { date };
        prop_assert_eq!(calendar.trading_day(), expected);
    }

    /// Property: a day is historical iff it precedes the trading day
    #[test]
    fn prop_day_classification(
        today in arb_date(),
        candidate in arb_date(),
        hour in 0u32..24,
    ) {
        let calendar = calendar_at(today, hour, 30);
        let trading_day = calendar.trading_day();
        prop_assert_eq!(
            calendar.is_historical(&TradingDate::Day(candidate)),
            candidate < trading_day
        );
    }

    /// Property: classification is monotonic, every earlier day of a
    /// historical day is historical too
    #[test]
    fn prop_classification_monotonic(
        today in arb_date(),
        candidate in arb_date(),
        back in 0i64..4_000,
    ) {
        let calendar = calendar_at(today, 12, 0);
        let earlier = candidate - TimeDelta::days(back);
        if calendar.is_historical(&TradingDate::Day(candidate)) {
            prop_assert!(calendar.is_historical(&TradingDate::Day(earlier)));
        }
    }

    /// Property: a year is historical iff every day in it is
    #[test]
    fn prop_year_matches_its_last_day(today in arb_date(), year in 1999i32..2056, hour in 0u32..24) {
        let calendar = calendar_at(today, hour, 0);
        let last_day = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
        prop_assert_eq!(
            calendar.is_historical(&TradingDate::Year(year)),
            calendar.is_historical(&TradingDate::Day(last_day))
        );
    }

    /// Property: formatted dates parse back and classify the same way
    #[test]
    fn prop_raw_string_matches_parsed(today in arb_date(), candidate in arb_date()) {
        let calendar = calendar_at(today, 12, 0);
        let raw = candidate.format("%Y%m%d").to_string();
        prop_assert_eq!(
            calendar.is_historical_str(&raw),
            calendar.is_historical(&TradingDate::Day(candidate))
        );
    }

    /// Property: malformed date strings are never historical
    #[test]
    fn prop_malformed_dates_not_historical(raw in "[0-9]{0,3}|[0-9]{5,7}|[0-9]{9,12}|[a-z]{4,8}") {
        let calendar = calendar_at(NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(), 12, 0);
        prop_assert!(!calendar.is_historical_str(&raw));
    }

    /// Property: a memory entry is served iff its age does not exceed its TTL
    #[test]
    fn prop_memory_ttl_boundary(ttl_ms in 1u64..600_000, elapsed_ms in 0u64..1_200_000) {
        let clock = ManualClock::shared(jst(2024, 3, 14, 10, 0));
        let store = TtlMemoryStore::new(clock.clone());
        let key = CacheKey::build("ticker", Vec::<(&str, &str)>::new());

        store.set(key.clone(), 1u8, Duration::from_millis(ttl_ms));
        clock.advance(Duration::from_millis(elapsed_ms));

        prop_assert_eq!(store.get(&key).is_some(), elapsed_ms <= ttl_ms);
    }
}
