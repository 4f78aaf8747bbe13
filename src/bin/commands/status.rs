use automigrate::{Model, OutputFormat, SchemaManager, TableStatus};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;
use tracing::warn;

use super::{load_models, print_output};

/// Arguments for the Status command
#[derive(Args)]
pub struct StatusArgs {
    /// Model files (JSON) to compare with the database
    #[clap(required = true, value_name = "MODEL")]
    pub models: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ModelStatus {
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<TableStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_migrated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Tabled)]
struct StatusRow {
    model: String,
    table: String,
    status: String,
    detail: String,
}

pub fn run(manager: &SchemaManager, args: StatusArgs, output_format: OutputFormat) -> bool {
    let mut results = Vec::new();
    let mut success = true;

    for (path, model) in load_models(&args.models) {
        let model_name = path.display().to_string();
        let model = match model {
            Ok(m) => m,
            Err(e) => {
                success = false;
                results.push(ModelStatus {
                    model: model_name,
                    table: None,
                    status: None,
                    last_migrated: None,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let table = model.table_name().to_string();
        match manager.table_status(&model) {
            Ok(status) => {
                let (last_migrated, error) = match manager.last_migrated(&table) {
                    Ok(stamp) => (stamp, None),
                    Err(e) => {
                        warn!("Could not read migration stamp of '{}': {}", table, e);
                        success = false;
                        (None, Some(e.to_string()))
                    }
                };
                results.push(ModelStatus {
                    model: model_name,
                    table: Some(table),
                    status: Some(status),
                    last_migrated,
                    error,
                });
            }
            Err(e) => {
                success = false;
                results.push(ModelStatus {
                    model: model_name,
                    table: Some(table),
                    status: None,
                    last_migrated: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let rows: Vec<StatusRow> = results.iter().map(to_row).collect();
    print_output(&results, &rows, output_format);
    success
}

fn to_row(result: &ModelStatus) -> StatusRow {
    let (status, detail) = match (&result.status, &result.error) {
        (Some(TableStatus::Drifted { expected, actual }), _) => (
            "drifted".to_string(),
            format!("live: {} | model: {}", actual.join(", "), expected.join(", ")),
        ),
        (Some(status), Some(error)) => (status.to_string(), error.clone()),
        (Some(status), None) => (
            status.to_string(),
            result.last_migrated.clone().unwrap_or_default(),
        ),
        (None, Some(error)) => ("error".to_string(), error.clone()),
        (None, None) => ("unknown".to_string(), String::new()),
    };

    StatusRow {
        model: result.model.clone(),
        table: result.table.clone().unwrap_or_default(),
        status,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(error: Option<&str>) -> ModelStatus {
        ModelStatus {
            model: "users.json".to_string(),
            table: Some("users".to_string()),
            status: Some(TableStatus::Current),
            last_migrated: None,
            error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_row_shows_meta_read_error() {
        let row = to_row(&status(Some("Failed to access metadata 'migrated_at:users'")));
        assert_eq!(row.status, "current");
        assert!(row.detail.contains("migrated_at:users"));
    }

    #[test]
    fn test_row_shows_last_migrated() {
        let mut result = status(None);
        result.last_migrated = Some("2026-01-01T00:00:00+00:00".to_string());
        assert_eq!(to_row(&result).detail, "2026-01-01T00:00:00+00:00");
    }
}
