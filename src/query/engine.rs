//! Query Engine
//!
//! Table-level semantics on top of `SchemaRegistry` (schemas, ID counters)
//! and `TableStore` (record documents):
//! - create / list / drop tables
//! - insert with positional values and ID assignment
//! - select / update / delete filtered by a single equality `Condition`
//! - info
//!
//! Every mutation validates its input before touching disk and invalidates
//! the result cache entries of the table once it succeeds. A mutation that
//! fails half-way restores what it already wrote, so a failed call leaves
//! the store as it found it.

use crate::cache::ResultCache;
use crate::catalog::SchemaRegistry;
use crate::error::{DbError, Result};
use crate::query::Condition;
use crate::storage::TableStore;
use crate::types::{validate_table_name, ColumnDef, Record, TableSchema, Value, ID_COLUMN};
use tracing::{error, warn};

/// Schema and size of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub schema: TableSchema,
    pub record_count: usize,
}

pub struct QueryEngine<'a> {
    registry: &'a SchemaRegistry,
    store: &'a TableStore,
    cache: &'a ResultCache,
}

impl<'a> QueryEngine<'a> {
    pub fn new(registry: &'a SchemaRegistry, store: &'a TableStore, cache: &'a ResultCache) -> Self {
        Self {
            registry,
            store,
            cache,
        }
    }

    // ==================== Table Operations ====================

    /// Create a table; the returned schema starts with `ID:int`
    pub fn create_table(&self, name: &str, columns: Vec<ColumnDef>) -> Result<TableSchema> {
        validate_table_name(name)?;
        if self.registry.table_exists(name) {
            return Err(DbError::DuplicateTable(name.to_string()));
        }
        TableSchema::from_user_columns(name, columns.clone())?;

        // A document without a registry entry belongs to no table
        if self.store.exists(name) {
            warn!(table = name, "removing orphaned table document");
            self.store.drop(name)?;
        }
        self.registry.create_table(name, columns)
    }

    /// Table names in creation order
    pub fn list_tables(&self) -> Vec<String> {
        self.registry.list_tables()
    }

    /// Schema and record count of `table`
    pub fn info(&self, table: &str) -> Result<TableInfo> {
        let schema = self.registry.get_schema(table)?;
        let record_count = self.store.load(table)?.len();
        Ok(TableInfo {
            schema,
            record_count,
        })
    }

    /// Remove a table's records and schema
    pub fn drop_table(&self, table: &str) -> Result<()> {
        self.registry.get_schema(table)?;

        let snapshot = match self.store.load(table) {
            Ok(records) => Some(records),
            Err(e) => {
                warn!(table, error = %e, "unreadable table document, dropping without backup");
                None
            }
        };

        self.store.drop(table)?;

        if let Err(e) = self.registry.drop_table(table) {
            if let Some(records) = snapshot {
                self.restore(table, &records);
            }
            return Err(e);
        }

        self.cache.invalidate(table);
        Ok(())
    }

    // ==================== Record Operations ====================

    /// Insert one record from positional values (all columns but `ID`)
    ///
    /// The ID is the table counter's current value; the counter advances only
    /// after the record has been written.
    pub fn insert(&self, table: &str, values: Vec<Value>) -> Result<Record> {
        let schema = self.registry.get_schema(table)?;
        let id = self.registry.peek_next_id(table)?;
        let record = schema.bind_row(id, values)?;

        let mut records = self.store.load(table)?;
        records.push(record.clone());
        self.store.save(table, &records)?;

        match self.registry.next_id(table) {
            Ok(assigned) => debug_assert_eq!(assigned, id),
            Err(e) => {
                records.pop();
                self.restore(table, &records);
                return Err(e);
            }
        }

        self.cache.invalidate(table);
        Ok(record)
    }

    /// Records matching `condition` (all records when `None`), in storage order
    pub fn select(&self, table: &str, condition: Option<&Condition>) -> Result<Vec<Record>> {
        let schema = self.registry.get_schema(table)?;
        if let Some(condition) = condition {
            condition.validate(&schema)?;
        }

        let records = self.store.load(table)?;
        Ok(match condition {
            Some(condition) => records.into_iter().filter(|r| condition.matches(r)).collect(),
            None => records,
        })
    }

    /// Set `set_column = set_value` on every record matching `filter`
    ///
    /// Matches are taken from the records as they were before the update,
    /// so each matching record is updated exactly once. Returns the count.
    pub fn update(
        &self,
        table: &str,
        set_column: &str,
        set_value: Value,
        filter: &Condition,
    ) -> Result<usize> {
        let schema = self.registry.get_schema(table)?;
        if set_column == ID_COLUMN {
            return Err(DbError::ReadOnlyColumn(ID_COLUMN.to_string()));
        }
        schema.check_value(set_column, &set_value)?;
        filter.validate(&schema)?;

        let mut records = self.store.load(table)?;
        let matching: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .map(|(i, _)| i)
            .collect();

        if matching.is_empty() {
            return Ok(0);
        }

        for &i in &matching {
            records[i].set(set_column, set_value.clone());
        }
        self.store.save(table, &records)?;

        self.cache.invalidate(table);
        Ok(matching.len())
    }

    /// Remove every record matching `filter`; returns the count
    pub fn delete(&self, table: &str, filter: &Condition) -> Result<usize> {
        let schema = self.registry.get_schema(table)?;
        filter.validate(&schema)?;

        let mut records = self.store.load(table)?;
        let before = records.len();
        records.retain(|r| !filter.matches(r));
        let deleted = before - records.len();

        if deleted == 0 {
            return Ok(0);
        }

        self.store.save(table, &records)?;
        self.cache.invalidate(table);
        Ok(deleted)
    }

    /// Best-effort rewrite of a table document after a failed mutation
    fn restore(&self, table: &str, records: &[Record]) {
        if let Err(e) = self.store.save(table, records) {
            error!(table, error = %e, "failed to restore table document");
        }
    }
}
