//! Database connection management
//!
//! This module provides the SQLite connection wrapper owned by the schema manager.

use rusqlite::Connection;

/// Quote an SQL identifier, doubling any embedded double quotes
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Core database connection wrapper
///
/// `DatabaseConn` provides a thin wrapper around SQLite connections,
/// handling both file-based and in-memory databases with consistent
/// configuration and error handling.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    pub fn open(path: Option<&str>) -> rusqlite::Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p)?,
            None => Connection::open_in_memory()?,
        };

        let db = DatabaseConn { conn };
        db.configure()?;
        Ok(db)
    }

    /// Open a database at the specified path (convenience method)
    pub fn open_path(path: &str) -> rusqlite::Result<Self> {
        Self::open(Some(path))
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::open(None)
    }

    fn configure(&self) -> rusqlite::Result<()> {
        // In-memory databases answer "memory" here
        let _: String = self
            .conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;

        self.conn.execute("PRAGMA synchronous=NORMAL", [])?;
        self.conn.execute("PRAGMA temp_store=MEMORY", [])?;
        self.conn.execute("PRAGMA foreign_keys=ON", [])?;

        Ok(())
    }

    /// Cap the database size to roughly `size_bytes`
    ///
    /// Returns the resulting page limit.
    pub fn limit_size(&self, size_bytes: u64) -> rusqlite::Result<u64> {
        let page_size: u64 = self
            .conn
            .query_row("PRAGMA page_size", [], |row| row.get(0))?;
        let pages = size_bytes.div_ceil(page_size.max(1)).max(1);

        self.conn.query_row(
            &format!("PRAGMA max_page_count = {}", pages),
            [],
            |row| row.get(0),
        )
    }

    /// Toggle foreign-key enforcement
    ///
    /// SQLite ignores this inside an open transaction.
    pub fn set_foreign_keys(&self, enabled: bool) -> rusqlite::Result<()> {
        let sql = if enabled {
            "PRAGMA foreign_keys=ON"
        } else {
            "PRAGMA foreign_keys=OFF"
        };
        self.conn.execute(sql, [])?;
        Ok(())
    }

    /// Toggle legacy `ALTER TABLE ... RENAME` behaviour
    ///
    /// With it on, a rename does not re-check views and triggers that name
    /// the table, so a rebuilt table can take over from a dropped one.
    pub fn set_legacy_alter_table(&self, enabled: bool) -> rusqlite::Result<()> {
        let sql = if enabled {
            "PRAGMA legacy_alter_table=ON"
        } else {
            "PRAGMA legacy_alter_table=OFF"
        };
        self.conn.execute(sql, [])?;
        Ok(())
    }

    /// Whether legacy `ALTER TABLE` behaviour is on
    pub fn legacy_alter_table_enabled(&self) -> rusqlite::Result<bool> {
        let enabled: i64 = self
            .conn
            .query_row("PRAGMA legacy_alter_table", [], |row| row.get(0))?;
        Ok(enabled == 1)
    }

    /// Whether foreign-key enforcement is currently on
    pub fn foreign_keys_enabled(&self) -> rusqlite::Result<bool> {
        let enabled: i64 = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))?;
        Ok(enabled == 1)
    }

    /// Execute a SQL statement
    pub fn execute(&self, sql: &str) -> rusqlite::Result<usize> {
        self.conn.execute(sql, [])
    }

    /// Begin an unchecked transaction
    ///
    /// The transaction rolls back when dropped without a commit.
    pub fn transaction(&self) -> rusqlite::Result<rusqlite::Transaction<'_>> {
        self.conn.unchecked_transaction()
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> rusqlite::Result<bool> {
        let count: i32 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1 COLLATE NOCASE",
            [table_name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Get the row count for a table
    pub fn table_count(&self, table_name: &str) -> rusqlite::Result<u64> {
        let query = format!("SELECT COUNT(*) FROM {}", quote_identifier(table_name));
        self.conn.query_row(&query, [], |row| row.get(0))
    }

    /// Column names of a table, in declaration order
    ///
    /// A missing table yields an empty list.
    pub fn table_columns(&self, table_name: &str) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", quote_identifier(table_name)))?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }
}
