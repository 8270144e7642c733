//! Query-side views: query embedding, retrieval, reranking, prompt assembly.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use ragsim_core::chunking::clean_text;
use ragsim_core::generation::build_system_instruction;
use ragsim_shared::{Chunk, Mode};

use super::ViewContext;
use crate::widgets::vector_bars;

pub(crate) fn draw_query_embed(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let question = ctx.session.question();
    let lines = vec![
        Line::from("Question").style(Style::default().fg(Color::DarkGray)),
        Line::from(format!("\"{question}\"")).style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("      ↓ same embedding model as the chunks"),
        Line::from(""),
        Line::from("Question vector").style(Style::default().fg(Color::Blue)),
        Line::from(vector_bars(question, 48)).style(Style::default().fg(Color::Blue)),
        Line::from(""),
        Line::from(
            "To find the answer, we compare the \"Question Vector\" against all \
             \"Chunk Vectors\" in the database.",
        )
        .style(Style::default().fg(Color::DarkGray)),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Query Embedding "));
    f.render_widget(p, area);
}

pub(crate) fn draw_retrieval(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let session = ctx.session;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let controls = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Top-K results: "),
            Span::styled(
                session.top_k().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Algorithm: "),
            Span::styled("Cosine Similarity", Style::default().fg(Color::Green)),
        ]),
        Line::from("+/- to change K").style(Style::default().fg(Color::DarkGray)),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Retrieval "));
    f.render_widget(controls, chunks[0]);

    let items: Vec<ListItem> = session
        .retrieved()
        .iter()
        .enumerate()
        .map(|(i, c)| ranked_item(i, c))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Top matches "),
    );
    f.render_widget(list, chunks[1]);
}

fn ranked_item(rank: usize, chunk: &Chunk) -> ListItem<'static> {
    let similarity = chunk.score.unwrap_or(0.0) * 100.0;
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                format!("#{} ", rank + 1),
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(chunk.id.clone(), Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("  Similarity: {similarity:.1}%"),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(format!("\"{}\"", clean_text(&chunk.text)))
            .style(Style::default().add_modifier(Modifier::ITALIC)),
        Line::from(""),
    ])
}

pub(crate) fn draw_rerank(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let session = ctx.session;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area);

    let toggle = if session.rerank_enabled() {
        Span::styled("[ON ]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("[OFF]", Style::default().fg(Color::DarkGray))
    };
    let header = Paragraph::new(Line::from(vec![
        Span::raw("Enable Reranker "),
        toggle,
        Span::raw("   (r to toggle)"),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Precision Improvement "),
    );
    f.render_widget(header, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let initial = snippet_list(session.retrieved(), Style::default().fg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Initial Retrieval (Fast) "),
        );
    f.render_widget(initial, cols[0]);

    match session.reranked() {
        Some(reranked) => {
            let list = snippet_list(
                reranked,
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Reranked Results (Accurate) "),
            );
            f.render_widget(list, cols[1]);
        }
        None => {
            let off = Paragraph::new("Reranking Disabled")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(off, cols[1]);
        }
    }

    let why = Paragraph::new(
        "Why rerank? Vector search can pull chunks that are semantically close but not \
         actually useful. Rerankers are smarter \"editors\" that fix the order.",
    )
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::Magenta));
    f.render_widget(why, rows[2]);
}

fn snippet_list(chunks: &[Chunk], style: Style) -> List<'static> {
    let items: Vec<ListItem> = chunks
        .iter()
        .map(|c| {
            let text: String = clean_text(&c.text).chars().take(60).collect();
            ListItem::new(format!("{}  {text}…", c.id)).style(style)
        })
        .collect();
    List::new(items)
}

pub(crate) fn draw_prompt(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let session = ctx.session;
    let system = build_system_instruction(Mode::Augmented, session.retrieved());

    let mut lines = vec![Line::from(" SYSTEM INSTRUCTION ").style(
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    lines.extend(system.lines().map(|l| Line::from(l.to_string()).style(Style::default().fg(Color::Blue))));
    lines.push(Line::from(""));
    lines.push(
        Line::from(" USER QUERY ").style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
    );
    lines.push(Line::from(session.question().to_string()).style(Style::default().fg(Color::Yellow)));
    lines.push(Line::from(""));
    lines.push(
        Line::from("This is what is actually sent to the LLM. It now has the \"cheat sheet\" it needs!")
            .style(Style::default().fg(Color::DarkGray)),
    );

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" The Augmented Prompt "),
        );
    f.render_widget(p, area);
}
