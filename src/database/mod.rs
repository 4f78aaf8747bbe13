//! Database module
//!
//! ```text
//! database/
//! └── core/             # Foundation
//!     ├── connection    # SQLite DatabaseConn wrapper and pragma introspection
//!     ├── options       # SchemaConfig
//!     ├── schema        # SchemaManager: create / rebuild / automigrate
//!     ├── outcome       # MigrationOutcome, TableStatus, StatusReport
//!     └── error         # SchemaError and status codes
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use automigrate::database::{SchemaConfig, SchemaManager};
//! use automigrate::model::ModelDefinition;
//!
//! let mut manager = SchemaManager::new(SchemaConfig::new("app").with_data_dir("~/.automigrate"));
//! manager.open()?;
//!
//! let users = ModelDefinition::from_file("models/users.json")?;
//! let outcome = manager.automigrate(&users)?;
//! println!("{}", outcome.message());
//! ```

pub mod core;

pub use self::core::{
    intersect_columns, matching_column, quote_identifier, AlterReport, DatabaseConn,
    MigrationOutcome, SchemaConfig, SchemaDefinitions, SchemaError, SchemaManager, StatusReport, TableStatus,
    IN_MEMORY, META_TABLE_NAME,
};

/// Ensure the data directory exists
pub fn ensure_data_dir(data_dir: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(data_dir)
        .map_err(|e| anyhow::anyhow!("Failed to create data directory '{}': {}", data_dir, e))
}
