//! Per-table record documents
//!
//! Each table lives in `<tables_dir>/<name>.json` as a JSON array of record
//! objects. The store keeps nothing in memory: every call reads or rewrites
//! the whole document.

use crate::error::Result;
use crate::storage::atomic_file::write_atomic;
use crate::types::Record;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    /// Open (and create if needed) the directory holding table documents
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.json", table))
    }

    /// Load all records of `table`; a missing document is an empty table
    pub fn load(&self, table: &str) -> Result<Vec<Record>> {
        let path = self.path_for(table);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let records: Vec<Record> = serde_json::from_slice(&data)?;
        Ok(records)
    }

    /// Overwrite the document of `table` with `records`
    pub fn save(&self, table: &str, records: &[Record]) -> Result<()> {
        let data = serde_json::to_vec_pretty(records)?;
        write_atomic(&self.path_for(table), &data)?;
        debug!(table, records = records.len(), "table document saved");
        Ok(())
    }

    /// Remove the document of `table`; no-op when it does not exist
    pub fn drop(&self, table: &str) -> Result<()> {
        match fs::remove_file(self.path_for(table)) {
            Ok(()) => {
                debug!(table, "table document removed");
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a document has been written for `table`
    pub fn exists(&self, table: &str) -> bool {
        self.path_for(table).exists()
    }
}
