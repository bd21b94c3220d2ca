//! Catalog: table schemas and identifier counters

pub mod registry;

pub use registry::SchemaRegistry;
