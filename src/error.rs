//! Error types for the TableDB engine

use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DbError>;

/// Result of a public `Database` call
pub type ReportResult<T> = std::result::Result<T, ErrorReport>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Table \"{0}\" does not exist")]
    TableNotFound(String),

    #[error("Table \"{0}\" already exists")]
    DuplicateTable(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Column \"{column}\" not found in table \"{table}\"")]
    ColumnNotFound { table: String, column: String },

    #[error("Expected {expected} value(s), got {actual}")]
    Arity { expected: usize, actual: usize },

    #[error("Type mismatch for column \"{column}\": expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: String,
        actual: String,
    },

    #[error("Column \"{0}\" is read-only")]
    ReadOnlyColumn(String),

    #[error("Storage error: {0}")]
    StorageIo(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl DbError {
    /// Stable classification of this error, kept intact through reporting
    pub fn kind(&self) -> ErrorKind {
        match self {
            DbError::TableNotFound(_) => ErrorKind::TableNotFound,
            DbError::DuplicateTable(_) => ErrorKind::DuplicateTable,
            DbError::InvalidSchema(_) => ErrorKind::InvalidSchema,
            DbError::ColumnNotFound { .. } => ErrorKind::ColumnNotFound,
            DbError::Arity { .. } => ErrorKind::Arity,
            DbError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            DbError::ReadOnlyColumn(_) => ErrorKind::ReadOnlyColumn,
            DbError::StorageIo(_) => ErrorKind::StorageIo,
            DbError::Parse(_) => ErrorKind::Parse,
        }
    }

    pub(crate) fn column_not_found(table: &str, column: &str) -> Self {
        DbError::ColumnNotFound {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl From<std::io::Error> for DbError {
    fn from(err: std::io::Error) -> Self {
        DbError::StorageIo(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::StorageIo(err.to_string())
    }
}

/// Error classification shared by `DbError` and `ErrorReport`
///
/// Serialized by its taxonomy name (`as_str`), e.g. `"ArityError"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TableNotFound,
    DuplicateTable,
    InvalidSchema,
    ColumnNotFound,
    Arity,
    TypeMismatch,
    ReadOnlyColumn,
    StorageIo,
    Parse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::TableNotFound => "TableNotFoundError",
            ErrorKind::DuplicateTable => "DuplicateTableError",
            ErrorKind::InvalidSchema => "InvalidSchemaError",
            ErrorKind::ColumnNotFound => "ColumnNotFoundError",
            ErrorKind::Arity => "ArityError",
            ErrorKind::TypeMismatch => "TypeMismatchError",
            ErrorKind::ReadOnlyColumn => "ReadOnlyColumnError",
            ErrorKind::StorageIo => "StorageIOError",
            ErrorKind::Parse => "ParseError",
        }
    }
}

impl Serialize for ErrorKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform failure report handed to the user-facing layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{kind}: {message}")]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<DbError> for ErrorReport {
    fn from(err: DbError) -> Self {
        ErrorReport {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_keeps_kind() {
        let err = DbError::column_not_found("users", "email");
        let report = ErrorReport::from(err);
        assert_eq!(report.kind, ErrorKind::ColumnNotFound);
        assert!(report.message.contains("email"));
        assert!(report.message.contains("users"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DbError = io.into();
        assert_eq!(err.kind(), ErrorKind::StorageIo);
    }

    #[test]
    fn test_report_serializes_kind_and_message() {
        let report = ErrorReport::from(DbError::Arity { expected: 2, actual: 3 });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["kind"], "ArityError");
        assert_eq!(json["message"], "Expected 2 value(s), got 3");
    }
}
