use automigrate::{OutputFormat, SchemaManager};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use super::print_output;

/// Arguments for the Columns command
#[derive(Args)]
pub struct ColumnsArgs {
    /// Table to inspect
    #[clap(value_name = "TABLE")]
    pub table: String,
}

#[derive(Debug, Serialize, Tabled)]
struct ColumnRow {
    position: usize,
    name: String,
}

pub fn run(manager: &SchemaManager, args: ColumnsArgs, output_format: OutputFormat) -> bool {
    let columns = match manager.current_columns(&args.table) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return false;
        }
    };

    if columns.is_empty() {
        eprintln!("Table '{}' does not exist", args.table);
        return false;
    }

    let rows: Vec<ColumnRow> = columns
        .into_iter()
        .enumerate()
        .map(|(i, name)| ColumnRow { position: i + 1, name })
        .collect();
    print_output(&rows, &rows, output_format);
    true
}
