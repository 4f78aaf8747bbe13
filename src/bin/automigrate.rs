use std::process::exit;

use automigrate::*;
use clap::{Parser, Subcommand};
use tracing::{error, Level};

mod commands;

use commands::columns::ColumnsArgs;
use commands::config::ConfigArgs;
use commands::migrate::MigrateArgs;
use commands::status::StatusArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.automigrate/automigrate.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information, including every executed statement
    #[clap(long)]
    debug: bool,

    /// Database name, overrides the configured one (":memory:" for a scratch database)
    #[clap(short, long)]
    database: Option<String>,

    /// Output format: table, markdown, json, json-pretty
    #[clap(short, long, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or rebuild tables so they match the given model files
    Migrate(MigrateArgs),

    /// Compare model files with the live tables without changing anything
    Status(StatusArgs),

    /// List the live columns of a table
    Columns(ColumnsArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = match AppConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            exit(1);
        }
    };
    if let Some(database) = cli.database {
        config.database_name = database;
    }
    if cli.debug {
        config.debug = true;
    }

    if let Commands::Config(args) = cli.command {
        commands::config::run(&config, args, cli.format);
        return;
    }

    let mut manager = SchemaManager::new(config.schema_config());
    if let Err(e) = manager.open() {
        error!("{}", e);
        eprintln!("ERROR: {}", e);
        exit(1);
    }

    let success = match cli.command {
        Commands::Migrate(args) => commands::migrate::run(&manager, args, cli.format),
        Commands::Status(args) => commands::status::run(&manager, args, cli.format),
        Commands::Columns(args) => commands::columns::run(&manager, args, cli.format),
        Commands::Config(_) => true,
    };

    if !success {
        exit(1);
    }
}
