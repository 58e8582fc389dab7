// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Trading session calendar.
//!
//! This module provides:
//! - Parsing of upstream date strings into [`TradingDate`]
//! - The exchange's trading-day boundary and historical-date classification
//!   ([`TradingCalendar`])

mod calendar;
mod date;

pub use calendar::TradingCalendar;
pub use date::TradingDate;
