//! Database configuration
//!
//! Values come from `Default`, optionally overridden by a JSON file
//! (`DBConfig::from_file`) and then by command-line flags.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_data_dir() -> PathBuf {
    PathBuf::from("./tabledb_data")
}

fn default_metadata_file() -> String {
    "db_meta.json".to_string()
}

fn default_tables_dir() -> String {
    "data".to_string()
}

fn default_slow_threshold_ms() -> u64 {
    100
}

fn default_cache_enabled() -> bool {
    true
}

/// 数据库配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DBConfig {
    /// Root directory holding the metadata document and table documents
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Metadata document file name (relative to `data_dir`)
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,

    /// Directory for per-table documents (relative to `data_dir`)
    #[serde(default = "default_tables_dir")]
    pub tables_dir: String,

    /// Operations at or above this duration are flagged as slow
    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: u64,

    /// Memoize select results until the table is mutated
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,
}

impl Default for DBConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            metadata_file: default_metadata_file(),
            tables_dir: default_tables_dir(),
            slow_threshold_ms: default_slow_threshold_ms(),
            cache_enabled: default_cache_enabled(),
        }
    }
}

impl DBConfig {
    /// Default configuration rooted at `data_dir`
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// 创建测试用配置（不标记慢操作）
    pub fn for_testing<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            slow_threshold_ms: u64::MAX,
            ..Self::new(data_dir)
        }
    }

    /// Load configuration from a JSON file; absent fields take defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_file)
    }

    pub fn tables_path(&self) -> PathBuf {
        self.data_dir.join(&self.tables_dir)
    }

    pub fn slow_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_threshold_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DBConfig::default();
        assert_eq!(config.metadata_file, "db_meta.json");
        assert_eq!(config.slow_threshold(), Duration::from_millis(100));
        assert!(config.cache_enabled);
        assert_eq!(
            config.tables_path(),
            PathBuf::from("./tabledb_data").join("data")
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "slow_threshold_ms": 5, "cache_enabled": false }"#).unwrap();

        let config = DBConfig::from_file(&path).unwrap();
        assert_eq!(config.slow_threshold_ms, 5);
        assert!(!config.cache_enabled);
        assert_eq!(config.metadata_file, "db_meta.json");
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let config = DBConfig::new(temp_dir.path());
        config.save(&path).unwrap();

        assert_eq!(DBConfig::from_file(&path).unwrap(), config);
    }
}
