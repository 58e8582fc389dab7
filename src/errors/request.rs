// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for logical market-data requests.

use super::TradingDateError;

/// Errors raised while building a [`MarketDataRequest`](crate::MarketDataRequest)
/// from caller-supplied parameters.
///
/// These are input errors that belong to the caller (the routing layer maps
/// them to a 400-class response). They are raised before any cache lookup.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// One or more required parameters are missing or empty.
    #[error("Missing required parameters: {}", missing.join(", "))]
    MissingParameters {
        /// Names of the missing parameters, in declaration order
        missing: Vec<&'static str>,
    },

    /// The price type is not `BID` or `ASK`.
    #[error("Invalid price type: {value}")]
    InvalidPriceType {
        /// The rejected value
        value: String,
    },

    /// The interval is not one of the supported candlestick intervals.
    #[error("Invalid kline interval: {value}")]
    InvalidInterval {
        /// The rejected value
        value: String,
    },

    /// The date does not match the shape the interval requires.
    #[error("Date {date} does not match interval {interval} (expected {expected})")]
    DateIntervalMismatch {
        /// The supplied date string
        date: String,
        /// The supplied interval
        interval: String,
        /// Human-readable expected shape
        expected: &'static str,
    },

    /// The date could not be parsed at all.
    #[error("Invalid date: {0}")]
    Date(#[from] TradingDateError),
}

impl RequestError {
    pub fn missing(missing: Vec<&'static str>) -> Self {
        RequestError::MissingParameters { missing }
    }

    pub fn invalid_price_type(value: impl Into<String>) -> Self {
        RequestError::InvalidPriceType {
            value: value.into(),
        }
    }

    pub fn invalid_interval(value: impl Into<String>) -> Self {
        RequestError::InvalidInterval {
            value: value.into(),
        }
    }
}
