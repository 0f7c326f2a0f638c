//! One-shot question.

use anyhow::{Context, Result};

use crate::domain::models::Config;
use crate::infrastructure::setup::build_agent;

/// Answer `query` once. With `--json`, print the tagged outcome instead of
/// the plain answer text.
pub async fn execute(config: &Config, query: &str, json: bool) -> Result<()> {
    let agent = build_agent(config)
        .await
        .context("Failed to initialize the agent")?;

    let outcome = agent.answer(query).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{}", outcome.into_text());
    }

    Ok(())
}
