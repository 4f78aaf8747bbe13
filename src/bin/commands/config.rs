use automigrate::{AppConfig, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also show whether the database file exists and its size
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    #[serde(flatten)]
    config: &'a AppConfig,
    sqlite_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_bytes: Option<u64>,
}

pub fn run(config: &AppConfig, args: ConfigArgs, output_format: OutputFormat) {
    let ConfigArgs { verbose } = args;

    let sqlite_path = config.sqlite_path();
    let (database_exists, size_bytes) = if verbose {
        let exists = Path::new(&sqlite_path).exists();
        let size = if exists {
            std::fs::metadata(&sqlite_path).ok().map(|m| m.len())
        } else {
            None
        };
        (Some(exists), size)
    } else {
        (None, None)
    };

    if output_format.is_json() {
        let info = ConfigInfo {
            config_file: AppConfig::config_file_path(),
            config,
            sqlite_path,
            database_exists,
            size_bytes,
        };
        match output_format.to_json(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        }
        return;
    }

    println!("Config File:        {}", AppConfig::config_file_path());
    println!("{}", config.summary());
    if let Some(exists) = database_exists {
        println!("Database Exists:    {}", exists);
    }
    if let Some(size) = size_bytes {
        println!("Database Size:      {}", automigrate::format_size(size));
    }
}
