//! Storage layer
//!
//! One JSON document per table, replaced atomically on every save.

pub(crate) mod atomic_file;
pub mod table_store;

pub use table_store::TableStore;
