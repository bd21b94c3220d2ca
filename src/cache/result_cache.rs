//! Select result cache
//!
//! Memoizes `select` results keyed by `(table, condition)`. Entries live
//! until the table they were computed from is mutated or dropped; there is
//! no TTL and no size bound, a process serves a single session.

use crate::error::Result;
use crate::query::Condition;
use crate::types::{Record, Value};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Cache signature: `(table, column, value)`
///
/// A match-all select has `column == value == None`, distinct from every
/// equality condition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub table: String,
    pub column: Option<String>,
    pub value: Option<Value>,
}

impl CacheKey {
    pub fn new(table: &str, condition: Option<&Condition>) -> Self {
        Self {
            table: table.to_string(),
            column: condition.map(|c| c.column.clone()),
            value: condition.map(|c| c.value.clone()),
        }
    }
}

/// Cache statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Total cache hits
    pub hits: u64,
    /// Total cache misses
    pub misses: u64,
    /// Current number of entries
    pub size: usize,
}

impl CacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<CacheKey, Arc<Vec<Record>>>>,
    stats: RwLock<CacheStats>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for `key`, computing and storing it on a miss
    ///
    /// `compute` is not called on a hit. A failing `compute` stores nothing.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Result<Vec<Record>>
    where
        F: FnOnce() -> Result<Vec<Record>>,
    {
        if let Some(rows) = self.entries.read().get(&key) {
            self.stats.write().hits += 1;
            trace!(table = %key.table, "result cache hit");
            return Ok(rows.as_ref().clone());
        }

        self.stats.write().misses += 1;
        let rows = compute()?;

        let mut entries = self.entries.write();
        entries.insert(key, Arc::new(rows.clone()));
        self.stats.write().size = entries.len();

        Ok(rows)
    }

    /// Drop every entry computed from `table`; returns how many were removed
    pub fn invalidate(&self, table: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| key.table != table);
        let removed = before - entries.len();
        self.stats.write().size = entries.len();

        if removed > 0 {
            trace!(table, removed, "result cache invalidated");
        }
        removed
    }

    /// Whether an entry exists for `key`
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Clear entire cache
    pub fn clear(&self) {
        self.entries.write().clear();
        *self.stats.write() = CacheStats::default();
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }
}
