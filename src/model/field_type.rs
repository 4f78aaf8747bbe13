//! Logical field types and their SQLite column types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical type of a model field
///
/// Models describe their fields with these types; each one maps onto a
/// single SQLite storage class through [`FieldType::sql_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    Date,
    Json,
    Blob,
}

impl FieldType {
    /// SQL column type used when creating tables
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::String | Self::Date | Self::Json => "TEXT",
            Self::Number => "REAL",
            Self::Integer | Self::Boolean => "INTEGER",
            Self::Blob => "BLOB",
        }
    }

    /// Get a list of all accepted type names for help text
    pub fn all_names() -> &'static [&'static str] {
        &[
            "string", "text", "char", "varchar", "number", "float", "double", "real", "decimal",
            "integer", "int", "bigint", "boolean", "bool", "date", "datetime", "timestamp",
            "json", "object", "array", "blob", "binary", "bytes",
        ]
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Integer => write!(f, "integer"),
            Self::Boolean => write!(f, "boolean"),
            Self::Date => write!(f, "date"),
            Self::Json => write!(f, "json"),
            Self::Blob => write!(f, "blob"),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "string" | "text" | "char" | "varchar" => Ok(Self::String),
            "number" | "float" | "double" | "real" | "decimal" => Ok(Self::Number),
            "integer" | "int" | "bigint" => Ok(Self::Integer),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" | "datetime" | "timestamp" => Ok(Self::Date),
            "json" | "object" | "array" => Ok(Self::Json),
            "blob" | "binary" | "bytes" => Ok(Self::Blob),
            _ => Err(format!(
                "Unknown field type '{}'. Valid types: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}
