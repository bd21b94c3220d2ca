//! Value, record and schema types for TableDB

mod table;

pub use table::{validate_table_name, ColumnDef, ColumnType, TableSchema, ID_COLUMN};

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A single typed cell value
///
/// Persisted as the bare JSON boolean / integer / string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    /// Name of the column type this value belongs to
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Str(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// One row: column name -> value
///
/// Columns keep the order they were set in, so a record bound from a schema
/// is stored as `{"ID": .., <columns in schema order>}`. Equality ignores
/// column order.
#[derive(Debug, Clone, Default)]
pub struct Record {
    values: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.values.iter().position(|(name, _)| name == column)
    }

    /// Record identifier, if the `ID` column holds an integer
    pub fn id(&self) -> Option<i64> {
        self.get(ID_COLUMN).and_then(Value::as_int)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|i| &self.values[i].1)
    }

    /// Overwrite `column` in place, or append it
    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        match self.position(&column) {
            Some(i) => self.values[i].1 = value,
            None => self.values.push((column, value)),
        }
    }

    /// Whether the record holds exactly `value` in `column`
    pub fn matches(&self, column: &str, value: &Value) -> bool {
        self.get(column) == Some(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// Values laid out in schema column order (missing cells are `None`)
    pub fn values_in<'a>(&'a self, schema: &'a TableSchema) -> Vec<Option<&'a Value>> {
        schema
            .columns
            .iter()
            .map(|col| self.get(&col.name))
            .collect()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .values
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Eq for Record {}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (column, value) in iter {
            record.set(column, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column name to value")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut record = Record::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    if record.position(&name).is_some() {
                        return Err(de::Error::custom(format!("duplicate column \"{}\"", name)));
                    }
                    record.values.push((name, value));
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_json_encoding() {
        let values = vec![Value::Int(28), Value::Str("Sergei".into()), Value::Bool(true)];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[28,"Sergei",true]"#);

        let back: Vec<Value> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_float_is_rejected() {
        assert!(serde_json::from_str::<Value>("1.5").is_err());
    }

    #[test]
    fn test_record_basics() {
        let record: Record = vec![
            ("ID", Value::Int(1)),
            ("name", Value::from("Sergei")),
        ]
        .into_iter()
        .collect();

        assert_eq!(record.id(), Some(1));
        assert!(record.matches("name", &Value::from("Sergei")));
        assert!(!record.matches("name", &Value::from("sergei")));
        assert!(!record.matches("age", &Value::Int(1)));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_record_json_keeps_column_order() {
        let mut record: Record = vec![
            ("ID", Value::Int(1)),
            ("name", Value::from("Sergei")),
            ("age", Value::Int(28)),
        ]
        .into_iter()
        .collect();
        record.set("age", Value::Int(29));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"ID":1,"name":"Sergei","age":29}"#);

        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back.columns().collect::<Vec<_>>(), vec!["ID", "name", "age"]);

        let reordered: Record = serde_json::from_str(r#"{"age":29,"ID":1,"name":"Sergei"}"#).unwrap();
        assert_eq!(reordered, record);

        assert!(serde_json::from_str::<Record>(r#"{"ID":1,"ID":2}"#).is_err());
    }

    #[test]
    fn test_bool_and_int_do_not_match() {
        let record: Record = vec![("flag", Value::Bool(true))].into_iter().collect();
        assert!(!record.matches("flag", &Value::Int(1)));
    }
}
