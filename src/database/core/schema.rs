//! Database schema management
//!
//! [`SchemaManager`] owns one connection and reconciles tables with the
//! models describing them:
//!
//! - no table: create it from the model,
//! - live columns equal the model's columns (same names, same order): nothing to do,
//! - anything else: rebuild the table with the model's columns, carrying over
//!   the data of every column the two sides share.
//!
//! A rebuild runs as a single transaction. If any statement fails the whole
//! rebuild is rolled back and the original table is left as it was.

use super::connection::{quote_identifier, DatabaseConn};
use super::error::SchemaError;
use super::options::SchemaConfig;
use super::outcome::{AlterReport, MigrationOutcome, TableStatus};
use crate::model::{model_columns, FieldDef, Model};
use chrono::Utc;
use rusqlite::Connection;
use tracing::{debug, info, warn};

/// Name of the bookkeeping table kept in every managed database
pub const META_TABLE_NAME: &str = "automigrate_meta";

/// Suffix of the scratch table used while rebuilding
pub const TEMP_TABLE_SUFFIX: &str = "_automigrate_tmp";

/// SQL builders for managed tables
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// SQL for creating the meta table (database version, description, migration stamps)
    pub const META_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS automigrate_meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );
    "#;

    /// Column definition list, e.g. `"name" TEXT, "age" REAL`
    pub fn column_definitions(columns: &[FieldDef]) -> String {
        columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.field_type.sql_type()))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for a model table
    pub fn create_table(table: &str, columns: &[FieldDef]) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_identifier(table),
            Self::column_definitions(columns)
        )
    }

    /// `CREATE TABLE` statement for the rebuild scratch table
    ///
    /// Deliberately without `IF NOT EXISTS`: a leftover scratch table must
    /// abort the rebuild instead of receiving rows.
    pub fn create_temp_table(temp: &str, columns: &[FieldDef]) -> String {
        format!(
            "CREATE TABLE {} ({})",
            quote_identifier(temp),
            Self::column_definitions(columns)
        )
    }

    /// Statement copying shared columns from `table` into `temp`
    ///
    /// `source` holds the live spellings and `target` the model spellings of
    /// the same columns, position by position.
    ///
    /// With no shared columns every old row still yields one new row, with
    /// all columns NULL.
    pub fn copy_rows(
        table: &str,
        temp: &str,
        source: &[String],
        target: &[String],
        columns: &[FieldDef],
    ) -> String {
        if target.is_empty() {
            let first = columns
                .first()
                .map(|c| quote_identifier(&c.name))
                .unwrap_or_else(|| "rowid".to_string());
            return format!(
                "INSERT INTO {} ({}) SELECT NULL FROM {}",
                quote_identifier(temp),
                first,
                quote_identifier(table)
            );
        }

        let list = |names: &[String]| {
            names
                .iter()
                .map(|c| quote_identifier(c))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "INSERT INTO {} ({}) SELECT {} FROM {}",
            quote_identifier(temp),
            list(target),
            list(source),
            quote_identifier(table)
        )
    }
}

/// Find `name` in `columns`, ignoring ASCII case as SQLite does
pub fn matching_column<'a>(name: &str, columns: &'a [String]) -> Option<&'a String> {
    columns.iter().find(|c| c.eq_ignore_ascii_case(name))
}

/// Expected columns that also exist in `current`, in expected order
///
/// Names compare case-insensitively; the expected spelling is returned.
pub fn intersect_columns(expected: &[String], current: &[String]) -> Vec<String> {
    expected
        .iter()
        .filter(|c| matching_column(c, current).is_some())
        .cloned()
        .collect()
}

/// Schema manager for one database
///
/// Holds the configuration and, once [`open`](Self::open) succeeded, the
/// connection every table operation runs on.
pub struct SchemaManager {
    config: SchemaConfig,
    db: Option<DatabaseConn>,
}

impl SchemaManager {
    /// Create a manager; no connection is made until [`open`](Self::open)
    pub fn new(config: SchemaConfig) -> Self {
        Self { config, db: None }
    }

    /// Create and open a manager in one step
    pub fn open_with(config: SchemaConfig) -> Result<Self, SchemaError> {
        let mut manager = Self::new(config);
        manager.open()?;
        Ok(manager)
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// The open connection
    pub fn connection(&self) -> Result<&DatabaseConn, SchemaError> {
        self.db.as_ref().ok_or(SchemaError::NotOpen)
    }

    /// Open (or create) the database described by the configuration
    ///
    /// Opening again replaces the current connection.
    pub fn open(&mut self) -> Result<(), SchemaError> {
        let name = self.config.database_name().to_string();
        let open_err = |source| SchemaError::Open {
            name: name.clone(),
            source,
        };

        let db = match self.config.database_path() {
            Some(path) => {
                let data_dir = self.config.data_dir();
                std::fs::create_dir_all(data_dir).map_err(|source| SchemaError::DataDir {
                    path: data_dir.display().to_string(),
                    source,
                })?;
                DatabaseConn::open_path(&path.to_string_lossy()).map_err(open_err)?
            }
            None => DatabaseConn::open_in_memory().map_err(open_err)?,
        };

        if let Some(limit) = self.config.size_limit() {
            let pages = db.limit_size(limit).map_err(open_err)?;
            debug!("Database '{}' limited to {} pages", name, pages);
        }

        db.execute(SchemaDefinitions::META_TABLE).map_err(open_err)?;
        set_meta(&db.conn, "version", self.config.version()).map_err(open_err)?;
        set_meta(&db.conn, "description", self.config.description()).map_err(open_err)?;

        info!(
            "Opened database '{}' (version {})",
            name,
            self.config.version()
        );
        self.db = Some(db);
        Ok(())
    }

    /// Column names a model's table should have, audit fields included
    pub fn expected_columns<M: Model + ?Sized>(model: &M) -> Vec<String> {
        model_columns(model).into_iter().map(|c| c.name).collect()
    }

    /// Live column names of a table; empty if the table does not exist
    pub fn current_columns(&self, table: &str) -> Result<Vec<String>, SchemaError> {
        self.connection()?
            .table_columns(table)
            .map_err(|source| SchemaError::Introspection {
                table: table.to_string(),
                source,
            })
    }

    /// Compare a model against its live table without changing anything
    pub fn table_status<M: Model + ?Sized>(&self, model: &M) -> Result<TableStatus, SchemaError> {
        let actual = self.current_columns(model.table_name())?;
        if actual.is_empty() {
            return Ok(TableStatus::Missing);
        }

        let expected = Self::expected_columns(model);
        if actual == expected {
            Ok(TableStatus::Current)
        } else {
            Ok(TableStatus::Drifted { expected, actual })
        }
    }

    /// Create the model's table if it does not exist yet
    ///
    /// An existing table is left untouched, whatever its columns, and
    /// reported as [`MigrationOutcome::Unchanged`].
    pub fn create_table<M: Model + ?Sized>(
        &self,
        model: &M,
    ) -> Result<MigrationOutcome, SchemaError> {
        let db = self.connection()?;
        let table = model.table_name();

        let exists = db
            .table_exists(table)
            .map_err(|source| SchemaError::Introspection {
                table: table.to_string(),
                source,
            })?;
        if exists {
            debug!("Table '{}' already exists, not creating it", table);
            return Ok(MigrationOutcome::Unchanged {
                table: table.to_string(),
            });
        }

        let columns = model_columns(model);
        let tx_err = |source| SchemaError::Transaction {
            table: table.to_string(),
            source,
        };

        let tx = db.transaction().map_err(tx_err)?;
        self.run(&tx, &SchemaDefinitions::create_table(table, &columns))
            .map_err(|source| SchemaError::TableCreation {
                table: table.to_string(),
                source,
            })?;
        stamp_migration(&tx, table).map_err(tx_err)?;
        tx.commit().map_err(tx_err)?;

        info!("Created table '{}'", table);
        Ok(MigrationOutcome::Created {
            table: table.to_string(),
            columns: columns.into_iter().map(|c| c.name).collect(),
        })
    }

    /// Rebuild the model's table with the model's columns
    ///
    /// Foreign-key enforcement is switched off and legacy `ALTER TABLE`
    /// renaming switched on for the duration of the rebuild. Both are
    /// restored afterwards, whether or not the rebuild succeeded. Views and
    /// triggers naming the table keep pointing at it by name.
    pub fn alter_table<M: Model + ?Sized>(&self, model: &M) -> Result<AlterReport, SchemaError> {
        let db = self.connection()?;
        let table = model.table_name();
        let tx_err = |source| SchemaError::Transaction {
            table: table.to_string(),
            source,
        };

        db.set_foreign_keys(false).map_err(tx_err)?;
        if let Err(source) = db.set_legacy_alter_table(true) {
            let _ = db.set_foreign_keys(true);
            return Err(tx_err(source));
        }

        let result = self.rebuild(db, table, &model_columns(model));
        let legacy_restored = db.set_legacy_alter_table(false);
        let fk_restored = db.set_foreign_keys(true);

        let report = result?;
        legacy_restored.map_err(tx_err)?;
        fk_restored.map_err(tx_err)?;
        Ok(report)
    }

    fn rebuild(
        &self,
        db: &DatabaseConn,
        table: &str,
        columns: &[FieldDef],
    ) -> Result<AlterReport, SchemaError> {
        let tx_err = |source| SchemaError::Transaction {
            table: table.to_string(),
            source,
        };

        let current = db
            .table_columns(table)
            .map_err(|source| SchemaError::Introspection {
                table: table.to_string(),
                source,
            })?;
        let expected: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();

        let kept = intersect_columns(&expected, &current);
        let source: Vec<String> = kept
            .iter()
            .filter_map(|c| matching_column(c, &current))
            .cloned()
            .collect();
        let added: Vec<String> = expected
            .iter()
            .filter(|c| matching_column(c, &current).is_none())
            .cloned()
            .collect();
        let dropped: Vec<String> = current
            .iter()
            .filter(|c| matching_column(c, &expected).is_none())
            .cloned()
            .collect();

        if !dropped.is_empty() {
            warn!(
                "Rebuilding table '{}' drops columns {:?} and their data",
                table, dropped
            );
        }

        let temp = format!("{}{}", table, TEMP_TABLE_SUFFIX);
        let tx = db.transaction().map_err(tx_err)?;

        self.run(&tx, &SchemaDefinitions::create_temp_table(&temp, columns))
            .map_err(tx_err)?;

        let mut rows_copied = 0;
        if !current.is_empty() {
            rows_copied = self
                .run(
                    &tx,
                    &SchemaDefinitions::copy_rows(table, &temp, &source, &kept, columns),
                )
                .map_err(tx_err)?;
            self.run(&tx, &format!("DROP TABLE {}", quote_identifier(table)))
                .map_err(tx_err)?;
        }

        self.run(
            &tx,
            &format!(
                "ALTER TABLE {} RENAME TO {}",
                quote_identifier(&temp),
                quote_identifier(table)
            ),
        )
        .map_err(tx_err)?;
        stamp_migration(&tx, table).map_err(tx_err)?;
        tx.commit().map_err(tx_err)?;

        info!(
            "Rebuilt table '{}': {} rows copied, {} columns kept, {} added, {} dropped",
            table,
            rows_copied,
            kept.len(),
            added.len(),
            dropped.len()
        );

        Ok(AlterReport {
            table: table.to_string(),
            kept,
            added,
            dropped,
            rows_copied,
        })
    }

    /// Bring the model's table in line with the model
    ///
    /// Every failure is reported as [`SchemaError::Migration`].
    pub fn automigrate<M: Model + ?Sized>(
        &self,
        model: &M,
    ) -> Result<MigrationOutcome, SchemaError> {
        let table = model.table_name();
        self.reconcile(model)
            .map_err(|e| e.into_migration(table))
    }

    fn reconcile<M: Model + ?Sized>(&self, model: &M) -> Result<MigrationOutcome, SchemaError> {
        match self.table_status(model)? {
            TableStatus::Missing => {
                info!("Table '{}' not found, creating", model.table_name());
                self.create_table(model)
            }
            TableStatus::Current => {
                debug!("Table '{}' is up to date", model.table_name());
                Ok(MigrationOutcome::Unchanged {
                    table: model.table_name().to_string(),
                })
            }
            TableStatus::Drifted { expected, actual } => {
                info!(
                    "Table '{}' has columns {:?}, expected {:?}; rebuilding",
                    model.table_name(),
                    actual,
                    expected
                );
                self.alter_table(model).map(MigrationOutcome::Altered)
            }
        }
    }

    /// Run [`automigrate`](Self::automigrate) for each model, stopping at the first failure
    pub fn automigrate_all(
        &self,
        models: &[&dyn Model],
    ) -> Result<Vec<MigrationOutcome>, SchemaError> {
        models.iter().map(|m| self.automigrate(*m)).collect()
    }

    /// When the table was last created or rebuilt (RFC 3339), if ever
    pub fn last_migrated(&self, table: &str) -> Result<Option<String>, SchemaError> {
        self.get_meta(&migration_key(table))
    }

    /// Set a metadata value
    pub fn set_meta(&self, key: &str, value: &str) -> Result<(), SchemaError> {
        set_meta(&self.connection()?.conn, key, value).map_err(|source| SchemaError::Meta {
            key: key.to_string(),
            source,
        })
    }

    /// Get a metadata value
    pub fn get_meta(&self, key: &str) -> Result<Option<String>, SchemaError> {
        let result: Result<String, _> = self.connection()?.conn.query_row(
            "SELECT value FROM automigrate_meta WHERE key = ?1",
            [key],
            |row| row.get(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(source) => Err(SchemaError::Meta {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn run(&self, conn: &Connection, sql: &str) -> rusqlite::Result<usize> {
        if self.config.debug() {
            debug!("{}", sql);
        }
        conn.execute(sql, [])
    }
}

fn migration_key(table: &str) -> String {
    format!("migrated_at:{}", table)
}

fn set_meta(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO automigrate_meta (key, value, updated_at) VALUES (?1, ?2, strftime('%s', 'now'))",
        [key, value],
    )?;
    Ok(())
}

fn stamp_migration(conn: &Connection, table: &str) -> rusqlite::Result<()> {
    set_meta(conn, &migration_key(table), &Utc::now().to_rfc3339())
}
