//! Single-column equality conditions

use crate::error::Result;
use crate::types::{Record, TableSchema, Value};
use std::fmt;

/// `column = value`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub column: String,
    pub value: Value,
}

impl Condition {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            value: value.into(),
        }
    }

    /// Resolve the column and type-check the value against `schema`
    pub fn validate(&self, schema: &TableSchema) -> Result<()> {
        schema.check_value(&self.column, &self.value)
    }

    pub fn matches(&self, record: &Record) -> bool {
        record.matches(&self.column, &self.value)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Str(s) => write!(f, "{} = {:?}", self.column, s),
            other => write!(f, "{} = {}", self.column, other),
        }
    }
}
