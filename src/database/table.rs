//! Database Table Management
//!
//! create / list / info / drop, each inside one instrumented window.

use crate::error::ReportResult;
use crate::gate::{Confirm, Outcome};
use crate::query::TableInfo;
use crate::types::{ColumnDef, TableSchema};

use super::core::Database;

impl Database {
    /// Create a new table; `ID:int` is prepended to `columns`
    ///
    /// # Example
    /// ```ignore
    /// use tabledb::types::{ColumnDef, ColumnType};
    ///
    /// db.create_table("users", vec![
    ///     ColumnDef::new("name", ColumnType::Str),
    ///     ColumnDef::new("age", ColumnType::Int),
    /// ])?;
    /// ```
    pub fn create_table(&self, name: &str, columns: Vec<ColumnDef>) -> ReportResult<TableSchema> {
        self.instrument
            .measure("create_table", || self.engine().create_table(name, columns))
    }

    /// Table names in creation order
    pub fn list_tables(&self) -> ReportResult<Vec<String>> {
        self.instrument
            .measure("list_tables", || Ok(self.engine().list_tables()))
    }

    /// Schema and record count
    pub fn info(&self, table: &str) -> ReportResult<TableInfo> {
        self.instrument.measure("info", || self.engine().info(table))
    }

    /// Drop a table and its records after `confirm` approves
    ///
    /// A declined drop returns `Outcome::Aborted` and touches nothing.
    pub fn drop_table(&self, table: &str, confirm: &mut dyn Confirm) -> ReportResult<Outcome<()>> {
        self.instrument.run("drop_table", || {
            self.gate
                .guard("drop_table", confirm, || self.engine().drop_table(table))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DBConfig;
    use crate::error::ErrorKind;
    use crate::gate::{AlwaysConfirm, NeverConfirm};
    use crate::types::ColumnType;

    fn users(db: &Database) {
        db.create_table(
            "users",
            vec![
                ColumnDef::new("name", ColumnType::Str),
                ColumnDef::new("age", ColumnType::Int),
            ],
        )
        .unwrap();
    }

    #[test]
    fn test_create_and_list() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::open(DBConfig::for_testing(temp_dir.path())).unwrap();

        users(&db);
        db.create_table("orders", vec![ColumnDef::new("total", ColumnType::Int)])
            .unwrap();

        assert_eq!(db.list_tables().unwrap(), vec!["users", "orders"]);
        assert_eq!(
            db.info("users").unwrap().schema.describe(),
            "ID:int, name:str, age:int"
        );

        let err = db.create_table("users", vec![]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DuplicateTable);
    }

    #[test]
    fn test_declined_drop_keeps_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::open(DBConfig::for_testing(temp_dir.path())).unwrap();
        users(&db);

        let meta_before = std::fs::read(temp_dir.path().join("db_meta.json")).unwrap();
        assert_eq!(db.drop_table("users", &mut NeverConfirm).unwrap(), Outcome::Aborted);
        let meta_after = std::fs::read(temp_dir.path().join("db_meta.json")).unwrap();

        assert_eq!(meta_before, meta_after);
        assert_eq!(db.list_tables().unwrap(), vec!["users"]);
    }

    #[test]
    fn test_drop_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Database::open(DBConfig::for_testing(temp_dir.path())).unwrap();
        users(&db);

        let mut asked = Vec::new();
        let mut confirm = |operation: &str| {
            asked.push(operation.to_string());
            true
        };
        assert_eq!(
            db.drop_table("users", &mut confirm).unwrap(),
            Outcome::Completed(())
        );
        assert_eq!(asked, vec!["drop_table"]);
        assert!(db.list_tables().unwrap().is_empty());

        let err = db.drop_table("users", &mut AlwaysConfirm).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TableNotFound);
        assert_eq!(db.info("users").unwrap_err().kind, ErrorKind::TableNotFound);
    }
}
