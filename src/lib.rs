//! TableDB Storage Engine
//!
//! 单用户、单进程的表格数据存储：JSON 文件持久化，带类型检查
//!
//! ## 核心特性
//! - 每张表一个 JSON 文档，元数据（schema + ID 计数器）单独存储
//! - 自动分配、永不复用的 `ID:int` 主键
//! - 单列等值条件的 select / update / delete
//! - 按表失效的查询结果缓存
//! - 破坏性操作（drop_table / delete）需要确认
//!
//! ## 架构
//! - 存储层: `SchemaRegistry` (catalog) + `TableStore` (storage)
//! - 查询层: `QueryEngine` + `ResultCache`
//! - 外层: `ConfirmationGate` + `Instrumentation`, composed by `Database`
//! - 命令层: lexer + parser producing `Command`

pub mod cache;
pub mod catalog;
pub mod config;
pub mod database;
pub mod gate;
pub mod instrument;
pub mod query;
pub mod sql;
pub mod storage;
pub mod types;

mod error;

pub use config::DBConfig;
pub use error::{DbError, ErrorKind, ErrorReport, ReportResult, Result};

// 主要对外 API
pub use database::{CommandOutput, Database};
pub use gate::{AlwaysConfirm, Confirm, NeverConfirm, Outcome};
pub use query::{Condition, TableInfo};
pub use sql::{parse_command, Command};
pub use types::{ColumnDef, ColumnType, Record, TableSchema, Value};
