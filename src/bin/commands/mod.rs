pub mod columns;
pub mod config;
pub mod migrate;
pub mod status;

use automigrate::{ModelDefinition, ModelError, OutputFormat};
use serde::Serialize;
use std::path::PathBuf;

/// Load every model file, keeping failures next to their path
pub(crate) fn load_models(paths: &[PathBuf]) -> Vec<(PathBuf, Result<ModelDefinition, ModelError>)> {
    paths
        .iter()
        .map(|p| (p.clone(), ModelDefinition::from_file(p)))
        .collect()
}

/// Print serializable results as JSON, or rows as a table
pub(crate) fn print_output<T: Serialize, R: tabled::Tabled>(
    results: &T,
    rows: &[R],
    output_format: OutputFormat,
) {
    if output_format.is_json() {
        match output_format.to_json(results) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        }
    } else {
        println!("{}", output_format.to_table(rows));
    }
}
