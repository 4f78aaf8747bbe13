use automigrate::{OutputFormat, SchemaError, SchemaManager, StatusReport};
use clap::Args;
use std::path::PathBuf;
use tabled::Tabled;

use super::{load_models, print_output};

/// Arguments for the Migrate command
#[derive(Args)]
pub struct MigrateArgs {
    /// Model files (JSON) to migrate, processed in order
    #[clap(required = true, value_name = "MODEL")]
    pub models: Vec<PathBuf>,

    /// Stop at the first failing model
    #[clap(long)]
    pub fail_fast: bool,
}

#[derive(Tabled)]
struct MigrateRow {
    model: String,
    status: u16,
    message: String,
}

pub fn run(manager: &SchemaManager, args: MigrateArgs, output_format: OutputFormat) -> bool {
    let MigrateArgs { models, fail_fast } = args;

    let mut reports: Vec<StatusReport> = Vec::new();
    let mut rows = Vec::new();
    let mut success = true;

    for (path, model) in load_models(&models) {
        let report = match model {
            Ok(model) => StatusReport::from(&manager.automigrate(&model)),
            Err(e) => StatusReport::from(&SchemaError::from(e)),
        };

        if !report.is_ok() {
            success = false;
        }
        rows.push(MigrateRow {
            model: path.display().to_string(),
            status: report.status_code,
            message: report.message.clone(),
        });
        reports.push(report);

        if !success && fail_fast {
            break;
        }
    }

    print_output(&reports, &rows, output_format);
    success
}
