//! Rolodeck CLI Binary
//!
//! Command-line interface for the Rolodeck contact book.

use clap::Parser;
use rolodeck::cli::{Cli, Overrides, RunContext};
use rolodeck::config::ConfigLoader;
use rolodeck::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Rolodeck CLI starting");

    let overrides = Overrides {
        store: cli.store.clone(),
        memory: cli.memory,
        no_latency: cli.no_latency,
    };
    let context = match RunContext::new(cli.root.clone(), cli.config.clone(), overrides) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error opening contact store: {}", e);
            eprintln!("{}", rolodeck::cli::map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", rolodeck::cli::map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args and the config file.
/// CLI flags override the config file, which overrides defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let loaded = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(&cli.root),
    };
    let mut config = loaded.ok().map(|c| c.logging).unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.format = format;
    }
    config
}
