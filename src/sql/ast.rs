/// Parsed shell commands
use crate::query::Condition;
use crate::types::Value;

/// `name:type` as typed by the user; the type is checked by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub type_name: String,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `create_table <name> <col>:<type> ...`
    CreateTable { name: String, columns: Vec<ColumnSpec> },
    /// `list_tables`
    ListTables,
    /// `drop_table <name>`
    DropTable { name: String },
    /// `insert into <table> values (...)`
    Insert { table: String, values: Vec<Value> },
    /// `select from <table> [where <col> = <value>]`
    Select {
        table: String,
        condition: Option<Condition>,
    },
    /// `update <table> set <col> = <value> where <col> = <value>`
    Update {
        table: String,
        set_column: String,
        set_value: Value,
        condition: Condition,
    },
    /// `delete from <table> where <col> = <value>`
    Delete { table: String, condition: Condition },
    /// `info <table>`
    Info { table: String },
    Help,
    Exit,
}

impl Command {
    /// Operation name used for instrumentation and confirmation prompts
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateTable { .. } => "create_table",
            Command::ListTables => "list_tables",
            Command::DropTable { .. } => "drop_table",
            Command::Insert { .. } => "insert",
            Command::Select { .. } => "select",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::Info { .. } => "info",
            Command::Help => "help",
            Command::Exit => "exit",
        }
    }
}
