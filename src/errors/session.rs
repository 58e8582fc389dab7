// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for trading date parsing.

/// Errors produced when a raw date string cannot be turned into a
/// [`TradingDate`](crate::TradingDate).
///
/// The classifier never surfaces these: a date that fails to parse is simply
/// "not historical", so it is never written to the durable store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradingDateError {
    /// The input is neither a 4-digit year nor an 8-digit `YYYYMMDD` date.
    #[error("Invalid trading date shape: {input:?} (expected YYYY or YYYYMMDD)")]
    InvalidShape {
        /// The rejected input
        input: String,
    },

    /// The input has the right shape but names a day that does not exist.
    #[error("Invalid calendar date: {input}")]
    InvalidCalendarDate {
        /// The rejected input
        input: String,
    },
}

impl TradingDateError {
    pub fn invalid_shape(input: impl Into<String>) -> Self {
        TradingDateError::InvalidShape {
            input: input.into(),
        }
    }

    pub fn invalid_calendar_date(input: impl Into<String>) -> Self {
        TradingDateError::InvalidCalendarDate {
            input: input.into(),
        }
    }
}
