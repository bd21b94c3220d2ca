/// Schema registry: table schemas and identifier counters
use crate::error::{DbError, Result};
use crate::storage::atomic_file::write_atomic;
use crate::types::{validate_table_name, ColumnDef, ColumnType, TableSchema, ID_COLUMN};
use parking_lot::RwLock;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-table metadata (persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TableEntry {
    /// Column definitions, `ID` first
    columns: Vec<ColumnDef>,
    /// Identifier handed to the next inserted record
    next_id: i64,
}

/// Registry metadata (persisted to disk)
///
/// Stored as a JSON object `name -> entry`; entries keep creation order.
#[derive(Debug, Clone, Default, PartialEq)]
struct RegistryMetadata {
    tables: Vec<(String, TableEntry)>,
}

impl RegistryMetadata {
    fn position(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|(n, _)| n == name)
    }

    fn get(&self, name: &str) -> Option<&TableEntry> {
        self.tables.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut TableEntry> {
        self.tables
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, e)| e)
    }
}

impl Serialize for RegistryMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for (name, entry) in &self.tables {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RegistryMetadata {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct MetadataVisitor;

        impl<'de> Visitor<'de> for MetadataVisitor {
            type Value = RegistryMetadata;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of table name to table metadata")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut meta = RegistryMetadata::default();
                while let Some((name, entry)) = access.next_entry::<String, TableEntry>()? {
                    if meta.position(&name).is_some() {
                        return Err(de::Error::custom(format!("duplicate table \"{}\"", name)));
                    }
                    meta.tables.push((name, entry));
                }
                Ok(meta)
            }
        }

        deserializer.deserialize_map(MetadataVisitor)
    }
}

/// Table registry for managing table schemas and ID counters
///
/// Every mutation is persisted before it returns. If persisting fails the
/// in-memory state is rolled back and `StorageIo` is returned.
pub struct SchemaRegistry {
    /// Metadata (protected by RwLock)
    metadata: RwLock<RegistryMetadata>,
    /// Persistence file path
    persist_path: PathBuf,
}

impl SchemaRegistry {
    /// Open the registry stored at `persist_path`
    ///
    /// A missing document is an empty registry.
    pub fn open<P: AsRef<Path>>(persist_path: P) -> Result<Self> {
        let persist_path = persist_path.as_ref().to_path_buf();

        if let Some(parent) = persist_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let metadata = if persist_path.exists() {
            let data = fs::read(&persist_path)?;
            let meta: RegistryMetadata = serde_json::from_slice(&data)?;
            Self::verify(&meta)?;
            meta
        } else {
            RegistryMetadata::default()
        };

        debug!(
            path = %persist_path.display(),
            tables = metadata.tables.len(),
            "schema registry loaded"
        );

        Ok(Self {
            metadata: RwLock::new(metadata),
            persist_path,
        })
    }

    /// Reject documents whose entries break the `ID:int`-first layout
    fn verify(meta: &RegistryMetadata) -> Result<()> {
        for (name, entry) in &meta.tables {
            let id_first = entry
                .columns
                .first()
                .map(|c| c.name == ID_COLUMN && c.col_type == ColumnType::Int)
                .unwrap_or(false);
            if !id_first || entry.next_id < 1 {
                return Err(DbError::StorageIo(format!(
                    "corrupt metadata for table \"{}\"",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Create a new table; `ID:int` is prepended to `columns`
    pub fn create_table(&self, name: &str, columns: Vec<ColumnDef>) -> Result<TableSchema> {
        validate_table_name(name)?;

        let mut meta = self.metadata.write();
        if meta.position(name).is_some() {
            return Err(DbError::DuplicateTable(name.to_string()));
        }

        let schema = TableSchema::from_user_columns(name, columns)?;
        meta.tables.push((
            name.to_string(),
            TableEntry {
                columns: schema.columns.clone(),
                next_id: 1,
            },
        ));

        if let Err(e) = self.persist(&meta) {
            meta.tables.pop();
            return Err(e);
        }

        info!(table = name, columns = %schema.describe(), "table created");
        Ok(schema)
    }

    /// Drop a table
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut meta = self.metadata.write();
        let pos = meta
            .position(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))?;

        let removed = meta.tables.remove(pos);
        if let Err(e) = self.persist(&meta) {
            meta.tables.insert(pos, removed);
            return Err(e);
        }

        info!(table = name, "table dropped");
        Ok(())
    }

    /// Get table schema
    pub fn get_schema(&self, name: &str) -> Result<TableSchema> {
        let meta = self.metadata.read();
        meta.get(name)
            .map(|entry| TableSchema::from_stored(name, entry.columns.clone()))
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// List all tables in creation order
    pub fn list_tables(&self) -> Vec<String> {
        self.metadata
            .read()
            .tables
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Check if table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.metadata.read().position(name).is_some()
    }

    /// Identifier the next `next_id` call will hand out
    pub fn peek_next_id(&self, name: &str) -> Result<i64> {
        self.metadata
            .read()
            .get(name)
            .map(|entry| entry.next_id)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    /// Return the table's next identifier and advance the counter
    pub fn next_id(&self, name: &str) -> Result<i64> {
        let mut meta = self.metadata.write();
        let entry = meta
            .get_mut(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))?;

        let id = entry.next_id;
        entry.next_id += 1;

        if let Err(e) = self.persist(&meta) {
            if let Some(entry) = meta.get_mut(name) {
                entry.next_id = id;
            }
            return Err(e);
        }

        Ok(id)
    }

    /// Persist metadata to disk
    fn persist(&self, meta: &RegistryMetadata) -> Result<()> {
        let data = serde_json::to_vec_pretty(meta)?;
        write_atomic(&self.persist_path, &data)?;
        debug!(path = %self.persist_path.display(), "schema registry persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn meta_path(dir: &Path) -> PathBuf {
        dir.join("db_meta.json")
    }

    fn user_columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("name", ColumnType::Str),
            ColumnDef::new("age", ColumnType::Int),
        ]
    }

    #[test]
    fn test_create_and_get_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();

        let schema = registry.create_table("users", user_columns()).unwrap();
        assert_eq!(schema.describe(), "ID:int, name:str, age:int");

        let retrieved = registry.get_schema("users").unwrap();
        assert_eq!(retrieved, schema);
    }

    #[test]
    fn test_duplicate_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();

        registry.create_table("users", user_columns()).unwrap();
        let err = registry.create_table("users", user_columns()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateTable);
    }

    #[test]
    fn test_invalid_schema_leaves_registry_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();

        let err = registry
            .create_table("t", vec![ColumnDef::new("ID", ColumnType::Int)])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
        assert!(!registry.table_exists("t"));
        assert!(!meta_path(temp_dir.path()).exists());
    }

    #[test]
    fn test_drop_table() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();

        registry.create_table("test", user_columns()).unwrap();
        assert!(registry.table_exists("test"));

        registry.drop_table("test").unwrap();
        assert!(!registry.table_exists("test"));

        let err = registry.drop_table("test").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableNotFound);
    }

    #[test]
    fn test_list_tables_in_creation_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();

        for name in ["zeta", "alpha", "mid"] {
            registry.create_table(name, user_columns()).unwrap();
        }
        assert_eq!(registry.list_tables(), vec!["zeta", "alpha", "mid"]);

        let reopened = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();
        assert_eq!(reopened.list_tables(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_next_id_is_monotonic_and_persisted() {
        let temp_dir = tempfile::tempdir().unwrap();
        {
            let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();
            registry.create_table("users", user_columns()).unwrap();
            assert_eq!(registry.peek_next_id("users").unwrap(), 1);
            assert_eq!(registry.next_id("users").unwrap(), 1);
            assert_eq!(registry.next_id("users").unwrap(), 2);
        }

        let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();
        assert_eq!(registry.next_id("users").unwrap(), 3);

        let err = registry.next_id("ghost").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TableNotFound);
    }

    #[test]
    fn test_persisted_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();
        registry.create_table("users", user_columns()).unwrap();

        let raw = fs::read_to_string(meta_path(temp_dir.path())).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["users"]["next_id"], 1);
        assert_eq!(json["users"]["columns"][0]["name"], "ID");
        assert_eq!(json["users"]["columns"][0]["type"], "int");
        assert_eq!(json["users"]["columns"][2]["type"], "int");
    }

    #[test]
    fn test_corrupt_document_is_storage_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(meta_path(temp_dir.path()), "{ not json").unwrap();

        let err = SchemaRegistry::open(meta_path(temp_dir.path())).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::StorageIo);
    }

    #[test]
    fn test_persist_failure_rolls_back() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = SchemaRegistry::open(meta_path(temp_dir.path())).unwrap();
        registry.create_table("users", user_columns()).unwrap();

        // A directory squatting on the temp file name makes the write fail
        fs::create_dir(temp_dir.path().join("db_meta.json.tmp")).unwrap();

        let err = registry.next_id("users").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageIo);
        assert_eq!(registry.peek_next_id("users").unwrap(), 1);

        let err = registry.create_table("other", user_columns()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StorageIo);
        assert!(!registry.table_exists("other"));
    }
}
