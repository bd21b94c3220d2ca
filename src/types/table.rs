/// Table schema definitions
use crate::error::{DbError, Result};
use crate::types::{Record, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Implicit identifier column present in every table
pub const ID_COLUMN: &str = "ID";

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Str,
    Bool,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Str => "str",
            ColumnType::Bool => "bool",
        }
    }

    /// Whether `value` is a legal cell for this type
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ColumnType::Int, Value::Int(_))
                | (ColumnType::Str, Value::Str(_))
                | (ColumnType::Bool, Value::Bool(_))
        )
    }

    /// Type-check `value` for `column`
    pub fn check(&self, column: &str, value: &Value) -> Result<()> {
        if self.accepts(value) {
            Ok(())
        } else {
            Err(DbError::TypeMismatch {
                column: column.to_string(),
                expected: self.name().to_string(),
                actual: value.type_name().to_string(),
            })
        }
    }
}

impl FromStr for ColumnType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int" => Ok(ColumnType::Int),
            "str" => Ok(ColumnType::Str),
            "bool" => Ok(ColumnType::Bool),
            other => Err(DbError::InvalidSchema(format!(
                "unsupported column type \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Column data type
    #[serde(rename = "type")]
    pub col_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            col_type,
        }
    }

    /// Build a column from its textual name and type, e.g. `("age", "int")`
    pub fn parse(name: &str, type_name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::InvalidSchema("empty column name".into()));
        }
        Ok(Self::new(name, type_name.trim().parse()?))
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.col_type)
    }
}

/// Check that a table name matches `[A-Za-z_][A-Za-z0-9_]*`
///
/// A leading digit is rejected: the command lexer reads `123` as an integer.
pub fn validate_table_name(name: &str) -> Result<()> {
    let Some(first) = name.chars().next() else {
        return Err(DbError::InvalidSchema("empty table name".into()));
    };
    if first.is_ascii_digit() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DbError::InvalidSchema(format!(
            "invalid table name \"{}\"",
            name
        )));
    }
    Ok(())
}

/// Table schema definition
///
/// `columns[0]` is always `ID:int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Table name
    pub name: String,
    /// Column definitions (ordered, `ID` first)
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Build a schema from caller-declared columns, prepending `ID:int`
    pub fn from_user_columns(name: &str, columns: Vec<ColumnDef>) -> Result<Self> {
        validate_table_name(name)?;
        if columns.is_empty() {
            return Err(DbError::InvalidSchema(format!(
                "table \"{}\" needs at least one column",
                name
            )));
        }

        let mut seen = HashSet::new();
        seen.insert(ID_COLUMN.to_string());

        let mut all = Vec::with_capacity(columns.len() + 1);
        all.push(ColumnDef::new(ID_COLUMN, ColumnType::Int));

        for col in columns {
            if col.name.is_empty() {
                return Err(DbError::InvalidSchema("empty column name".into()));
            }
            if col.name == ID_COLUMN {
                return Err(DbError::InvalidSchema(format!(
                    "column \"{}\" is reserved",
                    ID_COLUMN
                )));
            }
            if !seen.insert(col.name.clone()) {
                return Err(DbError::InvalidSchema(format!(
                    "duplicate column \"{}\"",
                    col.name
                )));
            }
            all.push(col);
        }

        Ok(Self {
            name: name.to_string(),
            columns: all,
        })
    }

    /// Rebuild a schema from persisted columns
    pub(crate) fn from_stored(name: &str, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.to_string(),
            columns,
        }
    }

    /// Get column by name
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get number of columns, `ID` included
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns the caller supplies values for (everything but `ID`)
    pub fn user_columns(&self) -> &[ColumnDef] {
        &self.columns[1..]
    }

    /// Resolve `column` and type-check `value` against it
    pub fn check_value(&self, column: &str, value: &Value) -> Result<()> {
        let col = self
            .get_column(column)
            .ok_or_else(|| DbError::column_not_found(&self.name, column))?;
        col.col_type.check(column, value)
    }

    /// Bind positional values to the user columns and stamp `id`
    pub fn bind_row(&self, id: i64, values: Vec<Value>) -> Result<Record> {
        let user = self.user_columns();
        if values.len() != user.len() {
            return Err(DbError::Arity {
                expected: user.len(),
                actual: values.len(),
            });
        }

        for (col, value) in user.iter().zip(&values) {
            col.col_type.check(&col.name, value)?;
        }

        let mut record = Record::new();
        record.set(ID_COLUMN, Value::Int(id));
        for (col, value) in user.iter().zip(values) {
            record.set(col.name.clone(), value);
        }
        Ok(record)
    }

    /// `ID:int, name:str, ...`
    pub fn describe(&self) -> String {
        self.columns
            .iter()
            .map(ColumnDef::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
