//! `seed` and `ingest`: write documents into the vector store.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use console::style;
use indicatif::ProgressBar;

use crate::cli::output::{create_progress_bar, progress};
use crate::domain::models::{Config, StoreBackend};
use crate::infrastructure::setup::Components;
use crate::services::{split_documents, IngestReport, SAMPLE_DOCUMENTS};

/// Insert the built-in sample documents.
pub async fn execute_seed(config: &Config, json: bool) -> Result<()> {
    ensure_persistent_backend(config)?;
    let texts = SAMPLE_DOCUMENTS.iter().map(ToString::to_string).collect();
    let report = ingest(config, texts, json).await?;
    finish(&report, json)
}

/// Read `files` and insert their contents.
pub async fn execute_ingest(config: &Config, files: &[PathBuf], split_lines: bool, json: bool) -> Result<()> {
    ensure_persistent_backend(config)?;
    let mut texts = Vec::new();
    for file in files {
        let content = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        texts.extend(split_documents(&content, split_lines));
    }

    if texts.is_empty() {
        bail!("No documents found in the given files");
    }

    let report = ingest(config, texts, json).await?;
    finish(&report, json)
}

/// Documents written to the memory backend are gone once this command exits.
fn ensure_persistent_backend(config: &Config) -> Result<()> {
    if config.store.backend == StoreBackend::Memory {
        bail!(
            "store.backend is memory: documents would be lost when this command exits. \
             Switch to sqlite or postgres to keep them (memory runs already start with the sample documents)"
        );
    }
    Ok(())
}

async fn ingest(config: &Config, texts: Vec<String>, json: bool) -> Result<IngestReport> {
    let components = Components::from_config(config)
        .await
        .context("Failed to open the vector store")?;
    components
        .store
        .ensure_schema()
        .await
        .context("Failed to prepare the vector store schema")?;
    let ingestor = components.ingestor()?;

    let total = texts.len() as u64;
    let bar: ProgressBar = if json {
        progress::hidden()
    } else {
        create_progress_bar(total)
    };
    bar.set_message("embedding");

    let report = ingestor
        .ingest_with_progress(texts, |n| bar.inc(n as u64))
        .await;
    bar.finish_and_clear();

    Ok(report)
}

fn finish(report: &IngestReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "{} Inserted {} document{}",
            style("✓").green(),
            report.inserted(),
            if report.inserted() == 1 { "" } else { "s" }
        );
        if report.failed > 0 {
            println!(
                "{} {} document{} failed",
                style("✗").red(),
                report.failed,
                if report.failed == 1 { "" } else { "s" }
            );
        }
    }

    if report.inserted() == 0 {
        let reason = report.first_error.as_deref().unwrap_or("nothing was inserted");
        bail!("Ingestion failed: {reason}");
    }
    Ok(())
}
