#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! automigrate - keep SQLite tables in line with model definitions
//!
//! A model names a table and lists its typed fields. [`SchemaManager`]
//! compares the model with the live table and then:
//!
//! - creates the table when it does not exist,
//! - leaves it alone when its columns already match (same names, same order),
//! - otherwise rebuilds it with the model's columns, carrying over the data of
//!   every column the old and new layouts share.
//!
//! Every managed table also gets `created_at`, `updated_at` and `deleted_at`
//! text columns.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | `automigrate` binary | `clap`, `tracing-subscriber` |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use automigrate::{
//!     FieldDef, FieldType, MigrationOutcome, ModelDefinition, SchemaConfig, SchemaManager,
//! };
//!
//! let mut manager = SchemaManager::new(SchemaConfig::new("app").with_data_dir("./data"));
//! manager.open()?;
//!
//! let users = ModelDefinition::new(
//!     "users",
//!     vec![
//!         FieldDef::new("name", FieldType::String),
//!         FieldDef::new("age", FieldType::Number),
//!     ],
//! )?;
//!
//! match manager.automigrate(&users)? {
//!     MigrationOutcome::Created { .. } => println!("created"),
//!     MigrationOutcome::Unchanged { .. } => println!("nothing to do"),
//!     MigrationOutcome::Altered(report) => println!("dropped {:?}", report.dropped),
//! }
//! ```

pub mod config;
pub mod database;
pub mod model;
pub mod output;

pub use config::{format_size, AppConfig};

pub use database::{
    AlterReport, DatabaseConn, MigrationOutcome, SchemaConfig, SchemaDefinitions, SchemaError,
    SchemaManager, StatusReport, TableStatus,
};

pub use model::{
    model_columns, FieldDef, FieldType, Model, ModelDefinition, ModelError, AUDIT_FIELDS,
};

pub use output::OutputFormat;
