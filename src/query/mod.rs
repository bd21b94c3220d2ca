//! Query layer: conditions and table/record operations

pub mod condition;
pub mod engine;

pub use condition::Condition;
pub use engine::{QueryEngine, TableInfo};
