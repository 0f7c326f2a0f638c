//! Retrieval without generation.

use anyhow::{Context, Result};

use crate::cli::output::TableFormatter;
use crate::domain::models::Config;
use crate::infrastructure::setup::Components;

/// Show the documents most similar to `query`.
///
/// Unlike `ask`, failures are reported rather than treated as "no results".
pub async fn execute(config: &Config, query: &str, top_k: Option<usize>, json: bool) -> Result<()> {
    let components = Components::from_config(config)
        .await
        .context("Failed to open the vector store")?;
    let retriever = components.retriever(config)?;
    let top_k = top_k.unwrap_or(config.retrieval.top_k);

    let documents = retriever
        .try_retrieve(query, top_k)
        .await
        .context("Search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
    } else if documents.is_empty() {
        println!("No documents found.");
    } else {
        println!("{}", TableFormatter::new().format_documents(&documents));
        println!(
            "\nShowing {} document{}",
            documents.len(),
            if documents.len() == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
