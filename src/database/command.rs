//! Command dispatch
//!
//! Routes a parsed `Command` to the matching `Database` method and wraps the
//! result in a `CommandOutput` the shell can render.

use crate::error::{ErrorReport, ReportResult, Result};
use crate::gate::{Confirm, Outcome};
use crate::query::TableInfo;
use crate::sql::{ColumnSpec, Command};
use crate::types::{ColumnDef, Record, TableSchema};

use super::core::Database;

/// Structured result of one command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    TableCreated(TableSchema),
    Tables(Vec<String>),
    TableDropped(String),
    Inserted(Record),
    /// Selected records with the schema giving their column order
    Rows {
        schema: TableSchema,
        records: Vec<Record>,
    },
    Updated(usize),
    Deleted(usize),
    Info(TableInfo),
    Help,
    Exit,
}

fn column_defs(specs: &[ColumnSpec]) -> Result<Vec<ColumnDef>> {
    specs
        .iter()
        .map(|spec| ColumnDef::parse(&spec.name, &spec.type_name))
        .collect()
}

impl Database {
    /// Execute one parsed command
    ///
    /// `confirm` is consulted only by `drop_table` and `delete`.
    pub fn execute(
        &self,
        command: &Command,
        confirm: &mut dyn Confirm,
    ) -> ReportResult<Outcome<CommandOutput>> {
        let output = match command {
            Command::CreateTable { name, columns } => {
                let schema = self.instrument.measure("create_table", || {
                    let columns = column_defs(columns)?;
                    self.engine().create_table(name, columns)
                })?;
                CommandOutput::TableCreated(schema)
            }
            Command::ListTables => CommandOutput::Tables(self.list_tables()?),
            Command::DropTable { name } => {
                return Ok(self
                    .drop_table(name, confirm)?
                    .map(|()| CommandOutput::TableDropped(name.clone())));
            }
            Command::Insert { table, values } => {
                CommandOutput::Inserted(self.insert(table, values.clone())?)
            }
            Command::Select { table, condition } => {
                let records = self.select(table, condition.as_ref())?;
                let schema = self.registry.get_schema(table).map_err(ErrorReport::from)?;
                CommandOutput::Rows { schema, records }
            }
            Command::Update {
                table,
                set_column,
                set_value,
                condition,
            } => CommandOutput::Updated(self.update(
                table,
                set_column,
                set_value.clone(),
                condition,
            )?),
            Command::Delete { table, condition } => {
                return Ok(self
                    .delete(table, condition, confirm)?
                    .map(CommandOutput::Deleted));
            }
            Command::Info { table } => CommandOutput::Info(self.info(table)?),
            Command::Help => CommandOutput::Help,
            Command::Exit => CommandOutput::Exit,
        };

        Ok(Outcome::Completed(output))
    }
}
