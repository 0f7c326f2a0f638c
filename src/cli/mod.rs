//! Command-line interface

pub mod commands;
pub mod output;
pub mod types;

pub use output::progress::{create_progress_bar, create_spinner};
pub use types::{Cli, Commands};

use console::style;
use serde_json::json;

/// Print an error (with its cause chain) to stderr and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_output: bool) -> ! {
    if json_output {
        let causes: Vec<String> = err.chain().skip(1).map(ToString::to_string).collect();
        let output = json!({
            "error": err.to_string(),
            "causes": causes,
        });
        eprintln!("{output}");
    } else {
        eprintln!("{} {err}", style("Error:").red().bold());
        for cause in err.chain().skip(1) {
            eprintln!("  {} {cause}", style("caused by:").dim());
        }
    }
    std::process::exit(1);
}
