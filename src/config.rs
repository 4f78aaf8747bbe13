use crate::database::{ensure_data_dir, SchemaConfig};
use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Path to the directory holding database files
    pub data_dir: String,

    /// Name of the database to manage (file `<data_dir>/<name>.sqlite3`)
    pub database_name: String,

    /// Version string recorded in the database
    pub version: String,

    /// Human-readable description recorded in the database
    pub description: Option<String>,

    /// Size hint in bytes, -1 for unlimited
    pub size: i64,

    /// Log executed statements
    pub debug: bool,
}

const EMPTY_CONFIG: &str = r#"### automigrate configuration file

### directory holding database files
# data_dir = "~/.automigrate"

### database to manage
# database_name = "automigrate"
# version = "1.0"
# description = "automigrate database"

### size hint in bytes (-1 for unlimited)
# size = -1

### log every executed statement
# debug = false
"#;

const DEFAULT_DATABASE_NAME: &str = "automigrate";
const CONFIG_FILE_NAME: &str = "automigrate.toml";

impl AppConfig {
    /// Load the configuration file and `AUTOMIGRATE_*` environment variables
    ///
    /// Without a path `~/.automigrate/automigrate.toml` is used. A missing
    /// file is created from a commented template.
    pub fn new(path: &Option<String>) -> Result<AppConfig> {
        let app_dir = app_dir()?;
        let file = match path {
            Some(p) => PathBuf::from(p),
            None => {
                std::fs::create_dir_all(&app_dir)
                    .map_err(|e| anyhow!("Unable to create automigrate directory: {}", e))?;
                app_dir.join(CONFIG_FILE_NAME)
            }
        };

        let mut builder = Config::builder();
        if file.exists() {
            builder = builder.add_source(config::File::new(
                &file.to_string_lossy(),
                config::FileFormat::Toml,
            ));
        } else {
            std::fs::write(&file, EMPTY_CONFIG)
                .map_err(|e| anyhow!("Unable to create config file {}: {}", file.display(), e))?;
        }

        // E.g., `AUTOMIGRATE_DATA_DIR=/srv/db automigrate ...` sets the data directory
        let settings = builder
            .add_source(config::Environment::with_prefix("AUTOMIGRATE"))
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_map(&config, &app_dir.to_string_lossy())
    }

    fn from_map(config: &HashMap<String, String>, default_dir: &str) -> Result<AppConfig> {
        let data_dir = match config.get("data_dir") {
            Some(p) => expand_home(p),
            None => {
                ensure_data_dir(default_dir)?;
                default_dir.to_string()
            }
        };

        let database_name = config
            .get("database_name")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
        if database_name.is_empty() {
            return Err(anyhow!("database_name must not be empty"));
        }

        let size = match config.get("size") {
            Some(s) => s
                .parse()
                .map_err(|e| anyhow!("Invalid size '{}': {}", s, e))?,
            None => crate::database::core::UNLIMITED_SIZE,
        };

        let debug = config
            .get("debug")
            .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false);

        Ok(AppConfig {
            data_dir,
            database_name,
            version: config
                .get("version")
                .cloned()
                .unwrap_or_else(|| crate::database::core::DEFAULT_VERSION.to_string()),
            description: config.get("description").cloned(),
            size,
            debug,
        })
    }

    /// Schema manager settings derived from this configuration
    pub fn schema_config(&self) -> SchemaConfig {
        let config = SchemaConfig::new(self.database_name.as_str())
            .with_version(self.version.as_str())
            .with_size(self.size)
            .with_debug(self.debug)
            .with_data_dir(self.data_dir.as_str());

        match &self.description {
            Some(description) => config.with_description(description.as_str()),
            None => config,
        }
    }

    /// Get the path to the SQLite database file
    pub fn sqlite_path(&self) -> String {
        match self.schema_config().database_path() {
            Some(p) => p.to_string_lossy().to_string(),
            None => self.database_name.clone(),
        }
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let schema = self.schema_config();
        let size = match schema.size_limit() {
            Some(bytes) => format_size(bytes),
            None => "unlimited".to_string(),
        };

        [
            format!("Data Directory:     {}", self.data_dir),
            format!("Database:           {}", self.database_name),
            format!("SQLite Path:        {}", self.sqlite_path()),
            format!("Version:            {}", schema.version()),
            format!("Description:        {}", schema.description()),
            format!("Size Limit:         {}", size),
            format!("Debug:              {}", self.debug),
        ]
        .join("\n")
    }

    /// Get the default config file path
    pub fn config_file_path() -> String {
        match app_dir() {
            Ok(dir) => dir.join(CONFIG_FILE_NAME).display().to_string(),
            Err(_) => format!("~/.automigrate/{}", CONFIG_FILE_NAME),
        }
    }
}

fn app_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".automigrate"))
        .ok_or_else(|| anyhow!("Could not find home directory"))
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Some(rest), Some(home)) => format!("{}{}", home.to_string_lossy(), rest),
        _ => path.to_string(),
    }
}

/// Format byte size to human-readable string
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_map_values() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = AppConfig::from_map(
            &map(&[
                ("data_dir", data_dir.as_str()),
                ("database_name", "shop"),
                ("version", "2.0"),
                ("description", "shop data"),
                ("size", "1048576"),
                ("debug", "true"),
            ]),
            "/unused",
        )
        .unwrap();

        assert_eq!(config.database_name, "shop");
        assert!(config.debug);

        let schema = config.schema_config();
        assert_eq!(schema.version(), "2.0");
        assert_eq!(schema.description(), "shop data");
        assert_eq!(schema.size_limit(), Some(1048576));
        assert_eq!(
            config.sqlite_path(),
            dir.path().join("shop.sqlite3").to_string_lossy()
        );
    }

    #[test]
    fn test_from_map_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let default_dir = dir.path().join("data");
        let default_dir = default_dir.to_string_lossy().to_string();

        let config = AppConfig::from_map(&HashMap::new(), &default_dir).unwrap();

        assert_eq!(config.data_dir, default_dir);
        assert!(std::path::Path::new(&default_dir).exists());
        assert_eq!(config.database_name, "automigrate");
        assert_eq!(config.version, "1.0");
        assert_eq!(config.size, -1);
        assert!(!config.debug);
        assert_eq!(config.schema_config().description(), "automigrate database");
    }

    #[test]
    fn test_from_map_rejects_bad_values() {
        assert!(AppConfig::from_map(&map(&[("data_dir", "/tmp"), ("size", "big")]), "/tmp").is_err());
        assert!(
            AppConfig::from_map(&map(&[("data_dir", "/tmp"), ("database_name", " ")]), "/tmp")
                .is_err()
        );
    }

    #[test]
    fn test_new_with_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("automigrate.toml");
        std::fs::write(
            &path,
            format!(
                "data_dir = \"{}\"\ndatabase_name = \"inventory\"\nsize = 4096\n",
                dir.path().display()
            ),
        )
        .unwrap();

        let config = AppConfig::new(&Some(path.to_string_lossy().to_string())).unwrap();
        assert_eq!(config.database_name, "inventory");
        assert_eq!(config.size, 4096);
    }

    #[test]
    fn test_new_creates_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.toml");

        let _ = AppConfig::new(&Some(path.to_string_lossy().to_string()));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("### automigrate configuration file"));
    }

    #[test]
    fn test_config_file_path() {
        let path = AppConfig::config_file_path();
        assert!(std::path::Path::new(&path).ends_with(".automigrate/automigrate.toml"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
