//! Schema manager errors
//!
//! Errors fall into a handful of coarse categories, each with a numeric
//! status code that is surfaced in [`StatusReport`](super::StatusReport).

use crate::model::ModelError;
use thiserror::Error as ThisError;

pub const STATUS_OK: u16 = 200;
pub const STATUS_OPEN_FAILURE: u16 = 500;
pub const STATUS_TABLE_CREATION_FAILURE: u16 = 501;
pub const STATUS_TRANSACTION_FAILURE: u16 = 502;
pub const STATUS_MIGRATION_FAILURE: u16 = 503;
pub const STATUS_NOT_OPEN: u16 = 504;
pub const STATUS_META_FAILURE: u16 = 505;
pub const STATUS_INVALID_MODEL: u16 = 400;

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("Failed to open database '{name}': {source}")]
    Open {
        name: String,
        source: rusqlite::Error,
    },

    #[error("Failed to prepare data directory '{path}': {source}")]
    DataDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to create table '{table}': {source}")]
    TableCreation {
        table: String,
        source: rusqlite::Error,
    },

    #[error("Transaction failed on table '{table}': {source}")]
    Transaction {
        table: String,
        source: rusqlite::Error,
    },

    #[error("Failed to read columns of table '{table}': {source}")]
    Introspection {
        table: String,
        source: rusqlite::Error,
    },

    #[error("Migration of table '{table}' failed: {source}")]
    Migration {
        table: String,
        source: Box<SchemaError>,
    },

    #[error("Failed to access metadata key '{key}': {source}")]
    Meta {
        key: String,
        source: rusqlite::Error,
    },

    #[error("Database is not open")]
    NotOpen,

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl SchemaError {
    /// Coarse status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Open { .. } | Self::DataDir { .. } => STATUS_OPEN_FAILURE,
            Self::TableCreation { .. } => STATUS_TABLE_CREATION_FAILURE,
            Self::Transaction { .. } => STATUS_TRANSACTION_FAILURE,
            Self::Introspection { .. } | Self::Migration { .. } => STATUS_MIGRATION_FAILURE,
            Self::NotOpen => STATUS_NOT_OPEN,
            Self::Meta { .. } => STATUS_META_FAILURE,
            Self::Model(_) => STATUS_INVALID_MODEL,
        }
    }

    /// Wrap an error as a migration failure for `table`
    ///
    /// Errors that already are migration failures are passed through.
    pub(crate) fn into_migration(self, table: &str) -> Self {
        match self {
            Self::Migration { .. } => self,
            other => Self::Migration {
                table: table.to_string(),
                source: Box::new(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SchemaError::NotOpen.status_code(), STATUS_NOT_OPEN);

        let err = SchemaError::TableCreation {
            table: "t".to_string(),
            source: rusqlite::Error::InvalidQuery,
        };
        assert_eq!(err.status_code(), STATUS_TABLE_CREATION_FAILURE);

        let wrapped = err.into_migration("t");
        assert_eq!(wrapped.status_code(), STATUS_MIGRATION_FAILURE);
        assert!(wrapped.to_string().contains("Failed to create table 't'"));
    }

    #[test]
    fn test_into_migration_is_not_nested_twice() {
        let err = SchemaError::NotOpen.into_migration("t").into_migration("t");
        match err {
            SchemaError::Migration { source, .. } => {
                assert!(matches!(*source, SchemaError::NotOpen))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
