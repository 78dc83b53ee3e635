//! Phone Specs - structured attribute extraction for smartphone listings
//!
//! Parses free-text marketplace titles (Cyrillic and Latin) into typed
//! attributes, merges raw catalog fields on top, and derives a price segment
//! and value score for every product.

// Module declarations
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use anyhow::{Context, Result};
use tracing::info;

use application::ParsingService;
use clap::Parser;
use cli::CliArgs;
use infrastructure::{AppConfig, init_logging_with_config};

/// Entry point of the `phone-specs` binary
pub fn run() -> Result<()> {
    let args = CliArgs::parse();
    let config_path = args.config;
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    init_logging_with_config(&config.logging).context("Failed to initialize logging")?;

    if let Some(path) = &config_path {
        info!("Configuration file: {}", path.display());
    }

    let service = ParsingService::new(&config)?;
    let output = service
        .process_reader(std::io::stdin().lock())
        .context("Failed to process input")?;
    ParsingService::write_records(&output.records, std::io::stdout().lock())
        .context("Failed to write records")?;

    info!(
        "Processed {} records, skipped {}",
        output.summary.processed, output.summary.skipped
    );
    Ok(())
}
