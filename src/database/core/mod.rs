//! Core database infrastructure
//!
//! - `DatabaseConn`: SQLite connection wrapper with configuration
//! - `SchemaConfig`: immutable settings of a managed database
//! - `SchemaManager`: table creation, rebuild and automigration
//! - `SchemaError`, `MigrationOutcome`, `StatusReport`: operation results

mod connection;
mod error;
mod options;
mod outcome;
mod schema;

pub use connection::{quote_identifier, DatabaseConn};
pub use error::{
    SchemaError, STATUS_INVALID_MODEL, STATUS_META_FAILURE, STATUS_MIGRATION_FAILURE,
    STATUS_NOT_OPEN, STATUS_OK, STATUS_OPEN_FAILURE, STATUS_TABLE_CREATION_FAILURE,
    STATUS_TRANSACTION_FAILURE,
};
pub use options::{SchemaConfig, DEFAULT_VERSION, IN_MEMORY, UNLIMITED_SIZE};
pub use outcome::{AlterReport, MigrationOutcome, StatusReport, TableStatus};
pub use schema::{
    intersect_columns, matching_column, SchemaDefinitions, SchemaManager, META_TABLE_NAME,
    TEMP_TABLE_SUFFIX,
};
