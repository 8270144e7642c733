//! Core TUI application state and event loop.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{info, warn};

use ragsim_core::catalog::{SAMPLE_QUESTIONS, step_info};
use ragsim_core::generation::ERROR_ANSWER;
use ragsim_core::{GenerationRequest, OpenRouterGenerator, Session, generate_answer, pipeline};
use ragsim_shared::{AppConfig, Mode, Step, load_config};

use crate::screens::{self, ViewContext};
use crate::widgets::{explanation, nav_bar, pipeline_list, spinner, status_bar};

/// Chunk size slider bounds and increment.
const CHUNK_SIZE_RANGE: (usize, usize) = (100, 1000);
const CHUNK_SIZE_STEP: usize = 100;

/// Top-K slider bounds.
const TOP_K_RANGE: (usize, usize) = (1, 5);

/// A finished generation call, posted back from its task.
type Completed = (GenerationRequest, String);

/// Application state.
pub(crate) struct App {
    /// The simulation run being visualized.
    pub session: Session,
    /// LLM client; `None` when no API key is configured.
    generator: Option<Arc<OpenRouterGenerator>>,
    results_tx: UnboundedSender<Completed>,
    results_rx: UnboundedReceiver<Completed>,
    /// Highlighted row in the pipeline sidebar.
    pub cursor: usize,
    /// Whether the question field is capturing keystrokes.
    pub editing: bool,
    /// Next sample question to insert.
    sample: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Status message shown in bottom bar.
    pub status: String,
    /// Whether help overlay is visible.
    pub show_help: bool,
    /// Frame counter for the spinner.
    pub tick: usize,
}

impl App {
    pub(crate) fn new(config: &AppConfig) -> Self {
        let (generator, status) = match OpenRouterGenerator::from_config(&config.openrouter) {
            Ok(g) => {
                info!(model = g.model(), "LLM client ready");
                (
                    Some(Arc::new(g)),
                    "Ready — press ? for help".to_string(),
                )
            }
            Err(e) => {
                warn!(error = %e, "LLM client unavailable; answers will show the error text");
                (
                    None,
                    format!("No LLM configured ({}) — press ? for help", config.openrouter.api_key_env),
                )
            }
        };
        Self::with_generator(config, generator, status)
    }

    fn with_generator(
        config: &AppConfig,
        generator: Option<Arc<OpenRouterGenerator>>,
        status: String,
    ) -> Self {
        let (results_tx, results_rx) = unbounded_channel();
        Self {
            session: Session::new(&config.simulation),
            generator,
            results_tx,
            results_rx,
            cursor: 0,
            editing: false,
            sample: 0,
            should_quit: false,
            status,
            show_help: false,
            tick: 0,
        }
    }

    fn switch_mode(&mut self, mode: Mode) {
        self.session.reset(mode);
        self.editing = false;
        self.sample = 0;
        self.status = mode.label().to_string();
    }

    fn next_sample(&mut self) {
        let q = SAMPLE_QUESTIONS[self.sample % SAMPLE_QUESTIONS.len()];
        self.sample += 1;
        self.session.set_question(q);
    }

    /// `+`/`-` on a step with a tunable parameter.
    fn adjust(&mut self, up: bool) {
        match self.session.step() {
            Step::Chunk => {
                let size = self.session.chunk_size();
                let size = if up {
                    size.saturating_add(CHUNK_SIZE_STEP)
                } else {
                    size.saturating_sub(CHUNK_SIZE_STEP)
                };
                self.session
                    .set_chunk_size(size.clamp(CHUNK_SIZE_RANGE.0, CHUNK_SIZE_RANGE.1));
            }
            Step::Retrieval => {
                let k = self.session.top_k();
                let k = if up { k + 1 } else { k.saturating_sub(1) };
                self.session.set_top_k(k.clamp(TOP_K_RANGE.0, TOP_K_RANGE.1));
            }
            _ => {}
        }
    }

    /// Reconcile after every input and launch any generation call it asks for.
    fn after_update(&mut self) {
        if let Some(pos) = pipeline::position(self.session.mode(), self.session.step()) {
            self.cursor = pos;
        }
        if let Some(request) = self.session.reconcile() {
            self.dispatch(request);
        }
    }

    fn dispatch(&mut self, request: GenerationRequest) {
        match &self.generator {
            Some(generator) => {
                let generator = Arc::clone(generator);
                let tx = self.results_tx.clone();
                tokio::spawn(async move {
                    let answer = generate_answer(generator.as_ref(), &request).await;
                    // The receiver is gone only when the app is shutting down.
                    let _ = tx.send((request, answer));
                });
            }
            None => {
                warn!(mode = %request.mode, "no LLM client configured");
                self.session
                    .complete_generation(&request, ERROR_ANSWER.to_string());
            }
        }
    }

    /// Apply finished generation calls.
    fn drain_results(&mut self) {
        while let Ok((request, answer)) = self.results_rx.try_recv() {
            if self.session.complete_generation(&request, answer) {
                self.status = format!("{} answer ready", request.mode.label());
            }
        }
    }
}

/// Sets up the terminal, runs the event loop, then restores the terminal.
pub(crate) fn run() -> Result<()> {
    let config = load_config()?;

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: &AppConfig) -> Result<()> {
    let mut app = App::new(config);

    loop {
        app.drain_results();
        terminal.draw(|f| draw(f, &app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key.code, key.modifiers);
                }
            }
        }

        app.tick = app.tick.wrapping_add(1);
        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if matches!(code, KeyCode::Char('c')) && modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.editing {
        match code {
            KeyCode::Esc | KeyCode::Enter => app.editing = false,
            KeyCode::Backspace => {
                app.session.question_mut().pop();
            }
            KeyCode::Char(c) => app.session.question_mut().push(c),
            _ => {}
        }
        app.after_update();
        return;
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    match code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('1') => app.switch_mode(Mode::Baseline),
        KeyCode::Char('2') => app.switch_mode(Mode::Augmented),
        KeyCode::Char('n') | KeyCode::Right => {
            if !app.session.advance() {
                app.status = if app.session.step() == Step::Question {
                    "Enter a question first".to_string()
                } else {
                    "Already at the last step".to_string()
                };
            }
        }
        KeyCode::Char('p') | KeyCode::Left => {
            app.session.previous();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.cursor = app.cursor.saturating_sub(1);
            return;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.cursor + 1 < app.session.steps().len() {
                app.cursor += 1;
            }
            return;
        }
        KeyCode::Enter => {
            if let Some(step) = app.session.steps().get(app.cursor).copied() {
                app.session.jump(step);
            }
        }
        KeyCode::Char('e') if app.session.step() == Step::Question => app.editing = true,
        KeyCode::Char('s') if app.session.step() == Step::Question => app.next_sample(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust(true),
        KeyCode::Char('-') => app.adjust(false),
        KeyCode::Char('r') if app.session.step() == Step::Rerank => app.session.toggle_rerank(),
        _ => return,
    }

    app.after_update();
}

fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Mode tabs
            Constraint::Min(1),    // Workspace
            Constraint::Length(3), // Navigation
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    // Mode switcher
    let tabs = Tabs::new(vec![
        Line::from(format!("[1] {}", Mode::Baseline.label())),
        Line::from(format!("[2] {}", Mode::Augmented.label())),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" RAG Simulation "),
    )
    .select(match app.session.mode() {
        Mode::Baseline => 0,
        Mode::Augmented => 1,
    })
    .style(Style::default().fg(Color::White))
    .highlight_style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .divider(" │ ");
    f.render_widget(tabs, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(28), // Pipeline sidebar
            Constraint::Min(30),    // Step view
            Constraint::Length(34), // Explanation
        ])
        .split(rows[1]);

    f.render_widget(pipeline_list(&app.session, app.cursor), cols[0]);

    // Step view, framed with a breadcrumb
    let frame = Block::default().borders(Borders::ALL).title(format!(
        " {} › {} ",
        app.session.mode().pipeline_name(),
        step_info(app.session.step()).title
    ));
    let inner = frame.inner(cols[1]);
    f.render_widget(frame, cols[1]);
    let ctx = ViewContext {
        session: &app.session,
        editing: app.editing,
        tick: app.tick,
    };
    screens::draw(f, inner, &ctx);

    f.render_widget(explanation(app.session.step()), cols[2]);
    f.render_widget(nav_bar(&app.session), rows[2]);

    // Status bar
    let status = if app.session.is_loading() {
        format!("{} {} · generating answer", spinner(app.tick), app.status)
    } else {
        app.status.clone()
    };
    f.render_widget(status_bar(&status), rows[3]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  n / →        Next step"),
        Line::from("  p / ←        Previous step"),
        Line::from("  ↑/↓ + Enter  Jump to a step in the sidebar"),
        Line::from("  1 / 2        Mode A (LLM only) / Mode B (LLM + RAG) — resets the run"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
        Line::from(""),
        Line::from("Step-specific:").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("  e            Edit the question"),
        Line::from("  s            Use the next sample question"),
        Line::from("  + / -        Chunk size (Chunking) or Top-K (Retrieval)"),
        Line::from("  r            Toggle the reranker (Reranking)"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help — press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
