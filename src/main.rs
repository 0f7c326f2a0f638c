//! Strand CLI entry point.

use anyhow::Result;
use clap::Parser;

use strand::cli::{commands, handle_error, Cli};
use strand::domain::models::Config;
use strand::infrastructure::config::ConfigLoader;
use strand::infrastructure::logging::LoggerImpl;

fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Held until exit so buffered file logs are flushed.
    let _logger = match LoggerImpl::init(&config.logging) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    if let Err(err) = commands::dispatch(cli.command(), &config, cli.json).await {
        handle_error(err, cli.json);
    }
}
