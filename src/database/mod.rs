//! Database Module
//!
//! # Module Structure
//! - `core`: Database struct and open methods
//! - `table`: Table management (create/list/info/drop)
//! - `crud`: Record operations (insert/select/update/delete)
//! - `command`: Dispatch of parsed commands

pub mod command;
pub mod core;
pub mod crud;
pub mod table;

pub use command::CommandOutput;
pub use core::Database;
