//! RAG simulator TUI — walk through a retrieval-augmented generation
//! pipeline step by step and compare it with a plain LLM answer.
//!
//! Built with `ratatui` + `crossterm`; the single outbound LLM call runs on
//! a tokio task so the interface stays responsive.

mod app;
mod screens;
mod widgets;

use color_eyre::eyre::Result;

/// Log file name inside the config directory (stdout belongs to the TUI).
const LOG_FILE: &str = "ragsim-tui.log";

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;
    app::run()
}

fn init_tracing() -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt};

    let dir = ragsim_shared::config_dir()?;
    std::fs::create_dir_all(&dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragsim=info"));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
