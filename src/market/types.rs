// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Upstream response models
//!
//! Prices and sizes stay as the decimal strings the API sends; the cache
//! layer stores them verbatim and never does arithmetic on them.

use serde::{Deserialize, Serialize};

/// Envelope shared by every public endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Upstream status code (0 on success)
    pub status: i32,
    pub data: T,
    /// Upstream response timestamp (ISO-8601)
    pub responsetime: String,
}

/// Exchange / instrument state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExchangeStatus {
    Maintenance,
    Close,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStatus {
    pub status: ExchangeStatus,
}

/// Latest rate for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub ask: String,
    pub bid: String,
    pub timestamp: String,
    pub status: ExchangeStatus,
}

/// One candlestick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kline {
    /// Open time, Unix milliseconds as a string
    pub open_time: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
}

/// Trading rules for one symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolRule {
    pub symbol: String,
    pub min_open_order_size: String,
    pub max_order_size: String,
    pub size_step: String,
    pub tick_size: String,
}

pub type StatusResponse = ApiResponse<MarketStatus>;
pub type TickerResponse = ApiResponse<Vec<Ticker>>;
pub type KlineResponse = ApiResponse<Vec<Kline>>;
pub type SymbolResponse = ApiResponse<Vec<SymbolRule>>;
