//! Results of schema operations

use super::error::{SchemaError, STATUS_OK};
use serde::Serialize;
use serde_json::Value;

/// What a migration did to a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// The table did not exist and was created
    Created { table: String, columns: Vec<String> },

    /// The live columns already matched the model
    Unchanged { table: String },

    /// The table was rebuilt with the model's columns
    Altered(AlterReport),
}

impl MigrationOutcome {
    pub fn table(&self) -> &str {
        match self {
            Self::Created { table, .. } | Self::Unchanged { table } => table,
            Self::Altered(report) => &report.table,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Created { table, .. } => format!("Table '{}' created", table),
            Self::Unchanged { table } => format!("Table '{}' is up to date", table),
            Self::Altered(report) => format!(
                "Table '{}' rebuilt ({} rows copied)",
                report.table, report.rows_copied
            ),
        }
    }
}

/// Details of a table rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlterReport {
    pub table: String,
    /// Columns whose data was carried over
    pub kept: Vec<String>,
    /// Columns new to the table, NULL in carried rows
    pub added: Vec<String>,
    /// Columns removed along with their data
    pub dropped: Vec<String>,
    pub rows_copied: usize,
}

/// Live state of a model's table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableStatus {
    /// No table (or a table with no columns) exists
    Missing,

    /// Columns match the model exactly, in order
    Current,

    /// Columns differ from the model
    Drifted {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableStatus::Missing => write!(f, "missing"),
            TableStatus::Current => write!(f, "current"),
            TableStatus::Drifted { .. } => write!(f, "drifted"),
        }
    }
}

/// Flat `{statusCode, message, data}` view of an operation result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl StatusReport {
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            status_code: STATUS_OK,
            message: message.into(),
            data,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status_code == STATUS_OK
    }
}

impl From<&MigrationOutcome> for StatusReport {
    fn from(outcome: &MigrationOutcome) -> Self {
        Self::ok(outcome.message(), serde_json::to_value(outcome).ok())
    }
}

impl From<&SchemaError> for StatusReport {
    fn from(err: &SchemaError) -> Self {
        Self {
            status_code: err.status_code(),
            message: err.to_string(),
            data: None,
        }
    }
}

impl From<&Result<MigrationOutcome, SchemaError>> for StatusReport {
    fn from(result: &Result<MigrationOutcome, SchemaError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::core::error::STATUS_NOT_OPEN;

    #[test]
    fn test_report_from_outcome() {
        let outcome = MigrationOutcome::Created {
            table: "users".to_string(),
            columns: vec!["name".to_string()],
        };
        let report = StatusReport::from(&outcome);

        assert!(report.is_ok());
        assert_eq!(report.message, "Table 'users' created");

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["data"]["action"], "created");
        assert_eq!(json["data"]["columns"][0], "name");
    }

    #[test]
    fn test_report_from_error() {
        let result: Result<MigrationOutcome, SchemaError> = Err(SchemaError::NotOpen);
        let report = StatusReport::from(&result);

        assert!(!report.is_ok());
        assert_eq!(report.status_code, STATUS_NOT_OPEN);

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_altered_outcome_serialization() {
        let outcome = MigrationOutcome::Altered(AlterReport {
            table: "users".to_string(),
            kept: vec!["name".to_string()],
            added: vec![],
            dropped: vec!["extra".to_string()],
            rows_copied: 2,
        });

        assert_eq!(outcome.table(), "users");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["action"], "altered");
        assert_eq!(json["dropped"][0], "extra");
        assert_eq!(json["rows_copied"], 2);
    }
}
