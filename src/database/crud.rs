//! CRUD Operations Module
//!
//! insert / select / update / delete on a single table.
//! `select` goes through the result cache when `cache_enabled` is set;
//! `delete` asks for confirmation first.

use crate::cache::CacheKey;
use crate::error::ReportResult;
use crate::gate::{Confirm, Outcome};
use crate::query::Condition;
use crate::types::{Record, Value};

use super::core::Database;

impl Database {
    // ==================== Record Operations ====================

    /// Insert a record from positional values (every column except `ID`)
    ///
    /// # Example
    /// ```ignore
    /// let record = db.insert("users", vec!["Sergei".into(), 28.into()])?;
    /// assert_eq!(record.id(), Some(1));
    /// ```
    pub fn insert(&self, table: &str, values: Vec<Value>) -> ReportResult<Record> {
        self.instrument
            .measure("insert", || self.engine().insert(table, values))
    }

    /// Records matching `condition`, or all records when `None`
    pub fn select(&self, table: &str, condition: Option<&Condition>) -> ReportResult<Vec<Record>> {
        self.instrument.measure("select", || {
            if !self.config.cache_enabled {
                return self.engine().select(table, condition);
            }
            let key = CacheKey::new(table, condition);
            self.cache
                .get_or_compute(key, || self.engine().select(table, condition))
        })
    }

    /// Set `set_column = set_value` on every record matching `condition`
    ///
    /// Returns the number of updated records.
    pub fn update(
        &self,
        table: &str,
        set_column: &str,
        set_value: Value,
        condition: &Condition,
    ) -> ReportResult<usize> {
        self.instrument.measure("update", || {
            self.engine().update(table, set_column, set_value, condition)
        })
    }

    /// Delete every record matching `condition` after `confirm` approves
    pub fn delete(
        &self,
        table: &str,
        condition: &Condition,
        confirm: &mut dyn Confirm,
    ) -> ReportResult<Outcome<usize>> {
        self.instrument.run("delete", || {
            self.gate
                .guard("delete", confirm, || self.engine().delete(table, condition))
        })
    }
}
