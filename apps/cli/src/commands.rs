//! CLI command definitions, routing, and tracing setup.

use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use ragsim_core::catalog::{DOCUMENT, step_info};
use ragsim_core::chunking::{clean_text, split_into_chunks};
use ragsim_core::generation::build_system_instruction;
use ragsim_core::retrieval::{keywords, retrieve};
use ragsim_core::{OpenRouterGenerator, Session, generate_answer, pipeline};
use ragsim_shared::{
    AppConfig, Chunk, Mode, SimulationConfig, Step, init_config, load_config, validate_api_key,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// RAG simulator — see how retrieval changes an LLM's answer.
#[derive(Parser)]
#[command(
    name = "ragsim",
    version,
    about = "Walk a retrieval-augmented generation pipeline step by step.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Walk one mode's pipeline from question to comparison.
    Walk {
        /// Pipeline mode: baseline (LLM only) or augmented (LLM + RAG).
        #[arg(short, long, default_value = "augmented")]
        mode: Mode,

        /// Question to ask.
        #[arg(short, long)]
        question: String,

        /// Chunk size in characters (defaults to config).
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Number of chunks to retrieve (defaults to config).
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Answer the same question in both modes and print them together.
    Compare {
        /// Question to ask.
        #[arg(short, long)]
        question: String,
    },

    /// List the steps of a pipeline.
    Steps {
        /// Pipeline mode (defaults to augmented).
        #[arg(short, long, default_value = "augmented")]
        mode: Mode,
    },

    /// Print the chunks of the built-in document.
    Chunks {
        /// Chunk size in characters (defaults to config).
        #[arg(short, long)]
        size: Option<usize>,
    },

    /// Score the document's chunks against a question.
    Retrieve {
        /// Question to score against.
        #[arg(short, long)]
        question: String,

        /// Chunk size in characters (defaults to config).
        #[arg(short, long)]
        size: Option<usize>,

        /// Number of chunks to keep (defaults to config).
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "ragsim=info",
        1 => "ragsim=debug",
        _ => "ragsim=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Walk {
            mode,
            question,
            chunk_size,
            top_k,
        } => cmd_walk(mode, &question, chunk_size, top_k).await,
        Command::Compare { question } => cmd_compare(&question).await,
        Command::Steps { mode } => cmd_steps(mode),
        Command::Chunks { size } => cmd_chunks(size),
        Command::Retrieve {
            question,
            size,
            top_k,
        } => cmd_retrieve(&question, size, top_k),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Simulation settings from config with command-line overrides applied.
fn simulation_settings(
    config: &AppConfig,
    chunk_size: Option<usize>,
    top_k: Option<usize>,
) -> SimulationConfig {
    let mut settings = config.simulation.clone();
    if let Some(size) = chunk_size {
        settings.chunk_size = size.max(1);
    }
    if let Some(k) = top_k {
        settings.top_k = k;
    }
    settings
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_walk(
    mode: Mode,
    question: &str,
    chunk_size: Option<usize>,
    top_k: Option<usize>,
) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    // Validate API key before doing anything
    let config = load_config()?;
    validate_api_key(&config)?;
    let generator = OpenRouterGenerator::from_config(&config.openrouter)?;

    let mut session = Session::new(&simulation_settings(&config, chunk_size, top_k));
    session.reset(mode);
    session.set_question(question);

    info!(%mode, run = %session.run_id(), model = generator.model(), "walking pipeline");

    let total = session.steps().len();
    loop {
        if let Some(request) = session.reconcile() {
            let spinner = Spinner::new(format!("Generating {} answer...", mode.label()))?;
            let answer = generate_answer(&generator, &request).await;
            spinner.finish();
            session.complete_generation(&request, answer);
        }

        let position = pipeline::position(mode, session.step()).unwrap_or(0) + 1;
        let info = step_info(session.step());
        println!();
        println!("  [{position}/{total}] {}", info.title);
        println!("  {}", "─".repeat(info.title.chars().count() + 8));
        print_step(&session);

        if !session.advance() {
            break;
        }
    }
    println!();

    Ok(())
}

async fn cmd_compare(question: &str) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }
    let config = load_config()?;
    validate_api_key(&config)?;
    let generator = OpenRouterGenerator::from_config(&config.openrouter)?;

    let mut answers = Vec::with_capacity(2);
    for mode in [Mode::Baseline, Mode::Augmented] {
        let mut session = Session::new(&config.simulation);
        session.reset(mode);
        session.set_question(question);

        let spinner = Spinner::new(format!("Running {}...", mode.pipeline_name()))?;
        while session.step() != Step::Generate {
            session.reconcile();
            if !session.advance() {
                break;
            }
        }
        session.reconcile_with(&generator).await;
        spinner.finish();

        info!(%mode, run = %session.run_id(), "answer ready");
        answers.push((mode, session.answer(mode).to_string()));
    }

    println!();
    println!("  Question: {question}");
    for (mode, answer) in &answers {
        println!();
        println!("  {}", mode.label());
        println!("  {}", "─".repeat(mode.label().chars().count()));
        print_indented(answer);
    }
    println!();

    Ok(())
}

fn cmd_steps(mode: Mode) -> Result<()> {
    println!();
    println!("  {}", mode.pipeline_name());
    println!();
    for (i, step) in pipeline::sequence(mode).iter().enumerate() {
        let info = step_info(*step);
        println!("  {:>2}. {:<24} {}", i + 1, info.title, info.tools.join(", "));
    }
    println!();
    Ok(())
}

fn cmd_chunks(size: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let settings = simulation_settings(&config, size, None);
    let chunks = split_into_chunks(DOCUMENT.content, DOCUMENT.name, settings.chunk_size);

    println!();
    println!(
        "  {} chunks of {} chars from {}",
        chunks.len(),
        settings.chunk_size,
        DOCUMENT.name
    );
    for chunk in &chunks {
        println!();
        println!("  {} ({} chars)", chunk.id, chunk.text.chars().count());
        print_indented(&chunk.text);
    }
    println!();
    Ok(())
}

fn cmd_retrieve(question: &str, size: Option<usize>, top_k: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let settings = simulation_settings(&config, size, top_k);
    let chunks = split_into_chunks(DOCUMENT.content, DOCUMENT.name, settings.chunk_size);
    let results = retrieve(question, &chunks, settings.top_k);

    info!(
        question,
        chunks = chunks.len(),
        top_k = settings.top_k,
        "scored chunks"
    );

    println!();
    println!("  Keywords: {}", keywords(question).join(" "));
    print_scored(&results);
    println!();
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Output helpers
// ---------------------------------------------------------------------------

/// Characters of chunk text shown next to a score.
const PREVIEW_CHARS: usize = 60;

fn print_step(session: &Session) {
    let document = session.document();
    match session.step() {
        Step::Question => println!("  Question: {}", session.question()),
        Step::Ingest => println!(
            "  Loaded {} ({}, {} chars)",
            document.name,
            document.kind,
            document.content.chars().count()
        ),
        Step::Clean => {
            let cleaned = clean_text(document.content);
            println!(
                "  {} chars → {} chars after whitespace normalization",
                document.content.chars().count(),
                cleaned.chars().count()
            );
        }
        Step::Chunk => println!(
            "  {} chunks · size {} · overlap {}",
            session.chunks().len(),
            session.chunk_size(),
            session.chunk_overlap()
        ),
        Step::Embed => println!("  {} vectors generated", session.chunks().len()),
        Step::Store => println!("  {} records indexed", session.chunks().len()),
        Step::QueryEmbed => {
            println!("  Keywords: {}", keywords(session.question()).join(" "));
        }
        Step::Retrieval => {
            println!("  Top-{} by similarity:", session.top_k());
            print_scored(session.retrieved());
        }
        Step::Rerank => match session.reranked() {
            Some(reranked) => {
                println!("  Reranker enabled:");
                print_scored(reranked);
            }
            None => println!("  Reranker disabled; similarity order kept"),
        },
        Step::Prompt => {
            print_indented(&build_system_instruction(session.mode(), session.retrieved()));
            println!();
            println!("  USER: {}", session.question());
        }
        Step::Generate => print_indented(session.answer(session.mode())),
        Step::Compare => {
            for mode in [Mode::Baseline, Mode::Augmented] {
                let answer = session.answer(mode);
                let answer = if answer.is_empty() { "(not run)" } else { answer };
                println!("  {}:", mode.label());
                print_indented(answer);
            }
        }
    }
}

fn print_scored(chunks: &[Chunk]) {
    for chunk in chunks {
        let score = chunk.score.unwrap_or_default();
        println!("    {:<6} {score:.2}  {}", chunk.id, preview(&chunk.text, PREVIEW_CHARS));
    }
}

/// Whitespace-collapsed `text`, cut to `max` characters with a trailing `…`
/// only when something was dropped.
fn preview(text: &str, max: usize) -> String {
    let cleaned = clean_text(text);
    if cleaned.chars().count() <= max {
        return cleaned;
    }
    let mut cut: String = cleaned.chars().take(max).collect();
    cut.push('…');
    cut
}

fn print_indented(text: &str) {
    for line in text.lines() {
        println!("    {line}");
    }
}

// ---------------------------------------------------------------------------
// CLI progress spinner
// ---------------------------------------------------------------------------

/// Spinner shown while waiting on the LLM.
struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn new(message: String) -> Result<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")?
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Ok(Self { bar })
    }

    fn finish(self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_arguments_parse() {
        let cli = Cli::try_parse_from([
            "ragsim", "walk", "--mode", "baseline", "--question", "hi", "--top-k", "2",
        ])
        .expect("parse");
        match cli.command {
            Command::Walk {
                mode,
                question,
                top_k,
                chunk_size,
            } => {
                assert_eq!(mode, Mode::Baseline);
                assert_eq!(question, "hi");
                assert_eq!(top_k, Some(2));
                assert_eq!(chunk_size, None);
            }
            _ => panic!("expected walk"),
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["ragsim", "steps", "--mode", "turbo"]).is_err());
    }

    #[test]
    fn preview_marks_only_truncated_text() {
        assert_eq!(preview("library  hours", 60), "library hours");
        let exact = "x".repeat(60);
        assert_eq!(preview(&exact, 60), exact);
        let long = "y".repeat(61);
        assert_eq!(preview(&long, 60), format!("{}…", "y".repeat(60)));
    }

    #[tokio::test]
    async fn walk_rejects_empty_question() {
        let err = cmd_walk(Mode::Augmented, "  ", None, None)
            .await
            .expect_err("empty question");
        assert!(err.to_string().contains("question must not be empty"));
    }

    #[test]
    fn overrides_replace_config_values() {
        let config = AppConfig::default();
        let settings = simulation_settings(&config, Some(0), Some(5));
        assert_eq!(settings.chunk_size, 1);
        assert_eq!(settings.top_k, 5);
        assert_eq!(settings.rerank, config.simulation.rerank);

        let untouched = simulation_settings(&config, None, None);
        assert_eq!(untouched.chunk_size, config.simulation.chunk_size);
    }
}
