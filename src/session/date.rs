// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Trading date parsing

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

use crate::errors::TradingDateError;

/// A date as the upstream API addresses candlestick data
///
/// Short intervals are requested per calendar day (`YYYYMMDD`), long
/// intervals per calendar year (`YYYY`). The raw string is parsed once at the
/// boundary; everything downstream works on the variant.
///
/// # Examples
///
/// ```rust
/// use fxcache::TradingDate;
/// use chrono::NaiveDate;
///
/// assert_eq!("2023".parse::<TradingDate>().unwrap(), TradingDate::Year(2023));
/// assert_eq!(
///     "20240313".parse::<TradingDate>().unwrap(),
///     TradingDate::Day(NaiveDate::from_ymd_opt(2024, 3, 13).unwrap())
/// );
/// assert!("2024-03-13".parse::<TradingDate>().is_err());
/// assert!("20240231".parse::<TradingDate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradingDate {
    /// A whole calendar year
    Year(i32),
    /// A single calendar day
    Day(NaiveDate),
}

impl TradingDate {
    /// Calendar year this date falls in
    pub fn year(&self) -> i32 {
        match self {
            TradingDate::Year(year) => *year,
            TradingDate::Day(day) => day.year(),
        }
    }
}

impl FromStr for TradingDate {
    type Err = TradingDateError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TradingDateError::invalid_shape(input));
        }

        // ASCII only from here, so byte slicing is safe
        let number = |s: &str| s.parse::<u32>().map_err(|_| TradingDateError::invalid_shape(input));

        match input.len() {
            4 => Ok(TradingDate::Year(number(input)? as i32)),
            8 => {
                let year = number(&input[0..4])? as i32;
                let month = number(&input[4..6])?;
                let day = number(&input[6..8])?;
                NaiveDate::from_ymd_opt(year, month, day)
                    .map(TradingDate::Day)
                    .ok_or_else(|| TradingDateError::invalid_calendar_date(input))
            }
            _ => Err(TradingDateError::invalid_shape(input)),
        }
    }
}

impl fmt::Display for TradingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradingDate::Year(year) => write!(f, "{year:04}"),
            TradingDate::Day(day) => write!(f, "{}", day.format("%Y%m%d")),
        }
    }
}
