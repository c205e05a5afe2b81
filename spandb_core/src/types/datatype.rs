use std::fmt;

use crate::error::{SchemaError, SchemaResult};

/// Column types of the Cloud Spanner dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Int64,
    Float64,
    Bool,
    String,
    Bytes,
    Date,
    Timestamp,
    Array(Box<DataType>),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int64 => write!(f, "INT64"),
            DataType::Float64 => write!(f, "FLOAT64"),
            DataType::Bool => write!(f, "BOOL"),
            DataType::String => write!(f, "STRING"),
            DataType::Bytes => write!(f, "BYTES"),
            DataType::Date => write!(f, "DATE"),
            DataType::Timestamp => write!(f, "TIMESTAMP"),
            DataType::Array(inner) => write!(f, "ARRAY<{inner}>"),
        }
    }
}

/// Resolves type names from parsed DDL into `DataType` descriptors.
///
/// The schema updater never interprets type names itself; it always goes
/// through a factory handed in via the schema-change context.
#[derive(Debug, Default)]
pub struct TypeFactory;

impl TypeFactory {
    pub fn new() -> Self {
        TypeFactory
    }

    pub fn resolve(&self, name: &str) -> SchemaResult<DataType> {
        let upper = name.trim().to_uppercase();
        if let Some(inner) = upper.strip_prefix("ARRAY<").and_then(|x| x.strip_suffix('>')) {
            return Ok(DataType::Array(Box::new(self.resolve(inner)?)));
        }
        match upper.as_str() {
            "INT64" => Ok(DataType::Int64),
            "FLOAT64" => Ok(DataType::Float64),
            "BOOL" => Ok(DataType::Bool),
            "STRING" => Ok(DataType::String),
            "BYTES" => Ok(DataType::Bytes),
            "DATE" => Ok(DataType::Date),
            "TIMESTAMP" => Ok(DataType::Timestamp),
            _ => Err(SchemaError::InvalidDdl(format!(
                "Unknown type '{name}'. Use INT64|FLOAT64|BOOL|STRING|BYTES|DATE|TIMESTAMP|ARRAY<type>"
            ))),
        }
    }
}
