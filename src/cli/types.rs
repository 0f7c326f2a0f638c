//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "strand")]
#[command(about = "Strand - retrieval-augmented answers from your own documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to `chat`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Load configuration from this file instead of .strand/
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive question-answering session
    Chat,

    /// Answer a single question and exit
    Ask {
        /// The question
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Show the stored documents most similar to a query
    Search {
        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Number of documents to return (at least 1)
        #[arg(short = 'k', long, value_parser = parse_top_k)]
        top_k: Option<usize>,
    },

    /// Insert the built-in sample documents
    Seed,

    /// Embed and store the contents of files
    Ingest {
        /// Files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Store each non-blank line as its own document
        #[arg(long)]
        split_lines: bool,
    },

    /// Create the config file and the vector store schema
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Config,
}

impl Cli {
    /// The subcommand to run, `chat` when none was given.
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}

/// Parse a retrieval depth, rejecting values below 1.
pub fn parse_top_k(value: &str) -> Result<usize, String> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a whole number"))?;
    if parsed < 1 {
        return Err(format!("top-k must be at least 1, got {parsed}"));
    }
    usize::try_from(parsed).map_err(|_| format!("top-k too large: {parsed}"))
}
