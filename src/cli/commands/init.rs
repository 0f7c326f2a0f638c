//! Project initialization.

use anyhow::{Context, Result};
use console::style;
use serde_json::json;

use crate::domain::models::Config;
use crate::infrastructure::setup::{build_store, create_config_file, SetupPaths};

/// Write `.strand/config.yaml` (unless present) and create the store schema.
pub async fn execute(config: &Config, force: bool, json: bool) -> Result<()> {
    let paths = SetupPaths::current()?;
    let wrote_config = create_config_file(&paths, force)?;

    let store = build_store(config)
        .await
        .context("Failed to open the vector store")?;
    store
        .ensure_schema()
        .await
        .context("Failed to create the vector store schema")?;

    if json {
        let output = json!({
            "config_file": paths.config_file.display().to_string(),
            "config_written": wrote_config,
            "store": store.name(),
            "dimension": store.dimension(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if wrote_config {
            println!("{} Wrote {}", style("✓").green(), paths.config_file.display());
        } else {
            println!("{} Kept existing {}", style("•").dim(), paths.config_file.display());
        }
        println!(
            "{} {} schema ready ({} dimensions)",
            style("✓").green(),
            store.name(),
            store.dimension()
        );
    }

    Ok(())
}
