//! Command handlers

pub mod ask;
pub mod chat;
pub mod config;
pub mod ingest;
pub mod init;
pub mod search;

use anyhow::Result;

use crate::cli::types::Commands;
use crate::domain::models::Config;

/// Run one parsed command against a loaded configuration.
pub async fn dispatch(command: Commands, config: &Config, json: bool) -> Result<()> {
    match command {
        Commands::Chat => chat::execute(config).await,
        Commands::Ask { query } => ask::execute(config, &query.join(" "), json).await,
        Commands::Search { query, top_k } => {
            search::execute(config, &query.join(" "), top_k, json).await
        }
        Commands::Seed => ingest::execute_seed(config, json).await,
        Commands::Ingest { files, split_lines } => {
            ingest::execute_ingest(config, &files, split_lines, json).await
        }
        Commands::Init { force } => init::execute(config, force, json).await,
        Commands::Config => self::config::execute(config, json),
    }
}
