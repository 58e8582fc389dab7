// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Market data model.
//!
//! - Response models mirroring the upstream FX API
//! - Logical requests and their validated parameters

mod request;
mod types;

pub use request::{KlineInterval, KlineParams, MarketDataRequest, PriceType};
pub use types::*;
