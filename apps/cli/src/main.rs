//! RAG simulator CLI — walk the retrieval-augmented generation pipeline
//! headlessly and compare the grounded answer with a plain LLM answer.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
