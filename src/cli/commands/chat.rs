//! Interactive question-answering loop.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::cli::output::create_spinner;
use crate::domain::models::Config;
use crate::infrastructure::setup::build_agent;
use crate::services::Agent;

const EXIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

/// What the loop should do with one line of input.
#[derive(Debug, PartialEq, Eq)]
pub enum LineAction<'a> {
    Skip,
    Exit,
    Ask(&'a str),
}

/// Classify a raw input line. Exit words match case-insensitively after
/// trimming; blank lines are skipped.
pub fn classify_line(line: &str) -> LineAction<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        LineAction::Skip
    } else if EXIT_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
        LineAction::Exit
    } else {
        LineAction::Ask(trimmed)
    }
}

fn print_banner(config: &Config) {
    println!("{}", style("💠 Strand Agent").bold().cyan());
    println!(
        "Store: {} | Embeddings: {} ({}) | Model: {}",
        style(format!("{:?}", config.store.backend).to_lowercase()).green(),
        style(&config.embedding.model).green(),
        config.embedding.dimension,
        style(&config.completion.model).green(),
    );
    println!("Note: Make sure you have:");
    println!("1. The vector store reachable (run `strand init` once)");
    println!("2. The completion server running at {}", config.completion.url);
    println!("3. Documents loaded (`strand seed` or `strand ingest`)");
    println!("Type 'quit', 'exit' or 'q' to leave.");
}

fn prompt() -> Result<()> {
    print!("\n{} ", style("You:").bold());
    std::io::stdout().flush().context("Failed to flush stdout")
}

fn goodbye() {
    println!("\nGoodbye!");
}

/// Run the loop until an exit word, end of input, or Ctrl-C.
pub async fn execute(config: &Config) -> Result<()> {
    let agent = build_agent(config)
        .await
        .context("Failed to initialize the agent")?;

    print_banner(config);

    let interrupt = Arc::new(Notify::new());
    let listener = listen_for_interrupt(Arc::clone(&interrupt));
    let result = run_loop(&agent, BufReader::new(tokio::io::stdin()), &interrupt).await;
    listener.abort();
    result
}

/// Install the Ctrl-C handler once for the whole session. A signal that
/// lands while nothing awaits `interrupt` is kept as its stored permit.
fn listen_for_interrupt(interrupt: Arc<Notify>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.notify_one();
        }
    })
}

async fn run_loop<R>(agent: &Agent, input: R, interrupt: &Notify) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        prompt()?;

        let line = tokio::select! {
            biased;
            () = interrupt.notified() => {
                goodbye();
                return Ok(());
            }
            line = lines.next_line() => line.context("Failed to read input")?,
        };

        let Some(line) = line else {
            goodbye();
            return Ok(());
        };

        let query = match classify_line(&line) {
            LineAction::Skip => continue,
            LineAction::Exit => {
                goodbye();
                return Ok(());
            }
            LineAction::Ask(query) => query,
        };

        let spinner = create_spinner("Thinking...");
        let answer = tokio::select! {
            biased;
            () = interrupt.notified() => {
                spinner.finish_and_clear();
                goodbye();
                return Ok(());
            }
            answer = agent.run(query) => answer,
        };
        spinner.finish_and_clear();

        println!("\n{} {answer}", style("Agent:").bold().cyan());
    }
}
