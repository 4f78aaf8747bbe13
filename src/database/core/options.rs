//! Schema manager configuration

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Database name that selects an in-memory database
pub const IN_MEMORY: &str = ":memory:";

pub const DEFAULT_VERSION: &str = "1.0";

/// Size hint meaning "no limit"
pub const UNLIMITED_SIZE: i64 = -1;

/// Immutable settings of a [`SchemaManager`](super::SchemaManager)
///
/// Built once with [`SchemaConfig::new`] and the `with_*` setters, then
/// handed to the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaConfig {
    database_name: String,
    version: String,
    description: String,
    size: i64,
    debug: bool,
    data_dir: PathBuf,
}

impl SchemaConfig {
    /// Create a configuration with defaults for everything but the name
    ///
    /// The database file lives in the current directory unless
    /// [`with_data_dir`](Self::with_data_dir) says otherwise.
    pub fn new(database_name: impl Into<String>) -> Self {
        let database_name = database_name.into();
        let description = format!("{} database", database_name);
        Self {
            database_name,
            version: DEFAULT_VERSION.to_string(),
            description,
            size: UNLIMITED_SIZE,
            debug: false,
            data_dir: PathBuf::from("."),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Size hint in bytes; zero or negative means unlimited
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    /// Log every executed statement at debug level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_name == IN_MEMORY
    }

    /// Size limit in bytes, if any
    pub fn size_limit(&self) -> Option<u64> {
        u64::try_from(self.size).ok().filter(|s| *s > 0)
    }

    /// Path of the database file, `None` for in-memory databases
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.is_in_memory() {
            None
        } else {
            Some(
                self.data_dir
                    .join(format!("{}.sqlite3", self.database_name)),
            )
        }
    }
}
