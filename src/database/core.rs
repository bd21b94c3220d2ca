//! Database Core - `Database` structure and initialization
//!
//! Owns every component and wires them together explicitly:
//! `Instrumentation` → `ConfirmationGate` → `ResultCache` → `QueryEngine`.
//! The engine is a short-lived view borrowing the registry, store and cache.

use crate::cache::{CacheStats, ResultCache};
use crate::catalog::SchemaRegistry;
use crate::config::DBConfig;
use crate::error::Result;
use crate::gate::ConfirmationGate;
use crate::instrument::{Instrumentation, RecordSink, TracingSink};
use crate::query::QueryEngine;
use crate::storage::TableStore;
use tracing::info;

/// TableDB instance
pub struct Database {
    pub(crate) config: DBConfig,
    pub(crate) registry: SchemaRegistry,
    pub(crate) store: TableStore,
    pub(crate) cache: ResultCache,
    pub(crate) gate: ConfirmationGate,
    pub(crate) instrument: Instrumentation,
}

impl Database {
    /// Open (or create) the database under `config.data_dir`
    pub fn open(config: DBConfig) -> Result<Self> {
        Self::with_sink(config, Box::new(TracingSink))
    }

    /// Open with a custom destination for operation records
    pub fn with_sink(config: DBConfig, sink: Box<dyn RecordSink>) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let registry = SchemaRegistry::open(config.metadata_path())?;
        let store = TableStore::open(config.tables_path())?;
        let instrument = Instrumentation::with_sink(config.slow_threshold(), sink);

        info!(
            data_dir = %config.data_dir.display(),
            tables = registry.list_tables().len(),
            cache_enabled = config.cache_enabled,
            "database opened"
        );

        Ok(Self {
            config,
            registry,
            store,
            cache: ResultCache::new(),
            gate: ConfirmationGate::new(),
            instrument,
        })
    }

    pub(crate) fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.registry, &self.store, &self.cache)
    }

    pub fn config(&self) -> &DBConfig {
        &self.config
    }

    /// Result cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached select result
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
