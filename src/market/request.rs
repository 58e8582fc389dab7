// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Logical market-data requests
//!
//! A [`MarketDataRequest`] is what the routing layer hands to the cache: the
//! endpoint plus whatever parameters select the data. It is independent of
//! HTTP so the policy can be exercised without a server.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::cache::{CacheDomain, CacheKey};
use crate::errors::RequestError;
use crate::session::TradingDate;

/// Side of the book a candlestick series is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceType {
    Bid,
    Ask,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Bid => "BID",
            PriceType::Ask => "ASK",
        }
    }
}

impl FromStr for PriceType {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BID" => Ok(PriceType::Bid),
            "ASK" => Ok(PriceType::Ask),
            other => Err(RequestError::invalid_price_type(other)),
        }
    }
}

impl fmt::Display for PriceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Candlestick interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "10min")]
    TenMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "4hour")]
    FourHours,
    #[serde(rename = "8hour")]
    EightHours,
    #[serde(rename = "12hour")]
    TwelveHours,
    #[serde(rename = "1day")]
    OneDay,
    #[serde(rename = "1week")]
    OneWeek,
    #[serde(rename = "1month")]
    OneMonth,
}

impl KlineInterval {
    pub const ALL: [KlineInterval; 12] = [
        KlineInterval::OneMinute,
        KlineInterval::FiveMinutes,
        KlineInterval::TenMinutes,
        KlineInterval::FifteenMinutes,
        KlineInterval::ThirtyMinutes,
        KlineInterval::OneHour,
        KlineInterval::FourHours,
        KlineInterval::EightHours,
        KlineInterval::TwelveHours,
        KlineInterval::OneDay,
        KlineInterval::OneWeek,
        KlineInterval::OneMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KlineInterval::OneMinute => "1min",
            KlineInterval::FiveMinutes => "5min",
            KlineInterval::TenMinutes => "10min",
            KlineInterval::FifteenMinutes => "15min",
            KlineInterval::ThirtyMinutes => "30min",
            KlineInterval::OneHour => "1hour",
            KlineInterval::FourHours => "4hour",
            KlineInterval::EightHours => "8hour",
            KlineInterval::TwelveHours => "12hour",
            KlineInterval::OneDay => "1day",
            KlineInterval::OneWeek => "1week",
            KlineInterval::OneMonth => "1month",
        }
    }

    /// Intervals of four hours and longer are requested per year (`YYYY`),
    /// shorter ones per day (`YYYYMMDD`)
    pub fn uses_yearly_date(&self) -> bool {
        !matches!(
            self,
            KlineInterval::OneMinute
                | KlineInterval::FiveMinutes
                | KlineInterval::TenMinutes
                | KlineInterval::FifteenMinutes
                | KlineInterval::ThirtyMinutes
                | KlineInterval::OneHour
        )
    }
}

impl FromStr for KlineInterval {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KlineInterval::ALL
            .into_iter()
            .find(|interval| interval.as_str() == s)
            .ok_or_else(|| RequestError::invalid_interval(s))
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a candlestick request
///
/// `date` is kept as the raw upstream string so the cache key matches the
/// request exactly. [`KlineParams::new`] validates it; a hand-built value with
/// a malformed date is still safe, it just never qualifies for durable caching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlineParams {
    pub symbol: String,
    pub price_type: PriceType,
    pub interval: KlineInterval,
    pub date: String,
}

impl KlineParams {
    /// Validates raw query values
    ///
    /// # Errors
    ///
    /// - [`RequestError::MissingParameters`] if any value is empty
    /// - [`RequestError::InvalidPriceType`] / [`RequestError::InvalidInterval`]
    /// - [`RequestError::Date`] if the date is neither `YYYY` nor `YYYYMMDD`
    /// - [`RequestError::DateIntervalMismatch`] if the date shape does not fit
    ///   the interval
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fxcache::{KlineInterval, KlineParams, PriceType};
    ///
    /// let params = KlineParams::new("USD_JPY", "BID", "1min", "20240313").unwrap();
    /// assert_eq!(params.interval, KlineInterval::OneMinute);
    /// assert_eq!(params.price_type, PriceType::Bid);
    ///
    /// assert!(KlineParams::new("USD_JPY", "BID", "1day", "20240313").is_err());
    /// assert!(KlineParams::new("", "BID", "1min", "").is_err());
    /// ```
    pub fn new(
        symbol: &str,
        price_type: &str,
        interval: &str,
        date: &str,
    ) -> Result<Self, RequestError> {
        let missing: Vec<&'static str> = [
            ("symbol", symbol),
            ("priceType", price_type),
            ("interval", interval),
            ("date", date),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(RequestError::missing(missing));
        }

        let price_type: PriceType = price_type.parse()?;
        let interval: KlineInterval = interval.parse()?;
        let parsed: TradingDate = date.parse()?;

        let yearly = matches!(parsed, TradingDate::Year(_));
        if yearly != interval.uses_yearly_date() {
            return Err(RequestError::DateIntervalMismatch {
                date: date.to_string(),
                interval: interval.to_string(),
                expected: if interval.uses_yearly_date() {
                    "YYYY"
                } else {
                    "YYYYMMDD"
                },
            });
        }

        Ok(Self {
            symbol: symbol.to_string(),
            price_type,
            interval,
            date: date.to_string(),
        })
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::kline(
            &self.symbol,
            self.price_type.as_str(),
            self.interval.as_str(),
            &self.date,
        )
    }

    /// Parameters in upstream query form
    pub fn query_pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("symbol", self.symbol.as_str()),
            ("priceType", self.price_type.as_str()),
            ("interval", self.interval.as_str()),
            ("date", self.date.as_str()),
        ]
    }
}

/// A logical request for market data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketDataRequest {
    /// Exchange status
    Status,
    /// Latest rates for all symbols
    Ticker,
    /// Candlesticks for one symbol, side, interval and date
    Klines(KlineParams),
    /// Trading rules for all symbols
    Symbols,
    /// Any other endpoint, cached in memory with the default TTL
    Other {
        domain: String,
        params: BTreeMap<String, String>,
    },
}

impl MarketDataRequest {
    /// Builds a request from an endpoint name and its query parameters
    ///
    /// `kline` and `klines` are both accepted for candlesticks.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use fxcache::MarketDataRequest;
    ///
    /// let request = MarketDataRequest::from_parts(
    ///     "klines",
    ///     [("symbol", "USD_JPY"), ("priceType", "ASK"), ("interval", "1hour"), ("date", "20240313")],
    /// )
    /// .unwrap();
    /// assert!(matches!(request, MarketDataRequest::Klines(_)));
    ///
    /// let request = MarketDataRequest::from_parts("ticker", Vec::<(&str, &str)>::new()).unwrap();
    /// assert_eq!(request, MarketDataRequest::Ticker);
    /// ```
    pub fn from_parts<I, K, V>(domain: &str, params: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let params: BTreeMap<String, String> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        let request = match domain {
            "status" => MarketDataRequest::Status,
            "ticker" => MarketDataRequest::Ticker,
            "symbols" => MarketDataRequest::Symbols,
            "kline" | "klines" => {
                let get = |name: &str| params.get(name).map(String::as_str).unwrap_or("");
                MarketDataRequest::Klines(KlineParams::new(
                    get("symbol"),
                    get("priceType"),
                    get("interval"),
                    get("date"),
                )?)
            }
            other => MarketDataRequest::Other {
                domain: other.to_string(),
                params,
            },
        };
        Ok(request)
    }

    pub fn domain(&self) -> CacheDomain {
        match self {
            MarketDataRequest::Status => CacheDomain::Status,
            MarketDataRequest::Ticker => CacheDomain::Ticker,
            MarketDataRequest::Klines(_) => CacheDomain::Kline,
            MarketDataRequest::Symbols => CacheDomain::Symbols,
            MarketDataRequest::Other { domain, .. } => CacheDomain::from(domain.as_str()),
        }
    }

    /// Deterministic cache key for this request
    pub fn cache_key(&self) -> CacheKey {
        match self {
            MarketDataRequest::Klines(params) => params.cache_key(),
            MarketDataRequest::Symbols => CacheKey::symbols(),
            MarketDataRequest::Other { domain, params } => CacheKey::build(domain, params),
            MarketDataRequest::Status | MarketDataRequest::Ticker => {
                CacheKey::build(self.domain().as_str(), Vec::<(&str, &str)>::new())
            }
        }
    }
}
