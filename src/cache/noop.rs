// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! No-operation durable store that disables persistence entirely

use async_trait::async_trait;
use serde_json::Value;

use super::{CacheKey, CacheStats, DurableStore};
use crate::errors::CacheError;

/// A durable store that never stores anything
///
/// Every read misses and every write succeeds without effect. Used when
/// persistence is turned off (`persist = false`), and handy in tests that
/// must not touch the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpStore;

#[async_trait]
impl DurableStore for NoOpStore {
    async fn get_value(&self, _key: &CacheKey) -> Option<Value> {
        None
    }

    async fn set_value(&self, _key: &CacheKey, _value: Value) -> Result<(), CacheError> {
        Ok(())
    }

    async fn has(&self, _key: &CacheKey) -> bool {
        false
    }

    async fn delete(&self, _key: &CacheKey) -> Result<(), CacheError> {
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }

    async fn stats(&self) -> CacheStats {
        CacheStats::default()
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
