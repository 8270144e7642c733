//! Ingestion-side views: load, clean, chunk, embed, store.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Wrap};

use ragsim_core::chunking::clean_text;

use super::ViewContext;
use crate::widgets::vector_bars;

/// Rows shown in the vector store preview.
const STORE_PREVIEW_ROWS: usize = 4;

pub(crate) fn draw_ingest(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let doc = ctx.session.document();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let card = Paragraph::new(vec![
        Line::from(doc.name).style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(format!("{} • Loaded • {} characters", doc.kind, doc.content.chars().count()))
            .style(Style::default().fg(Color::Green)),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Source document "));
    f.render_widget(card, chunks[0]);

    let raw = Paragraph::new(doc.content)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Raw text "));
    f.render_widget(raw, chunks[1]);
}

pub(crate) fn draw_clean(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let doc = ctx.session.document();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let before = Paragraph::new(doc.content)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Raw input "));
    f.render_widget(before, cols[0]);

    let after = Paragraph::new(clean_text(doc.content))
        .style(Style::default().fg(Color::Blue))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Cleaned output "));
    f.render_widget(after, cols[1]);
}

pub(crate) fn draw_chunks(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let session = ctx.session;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let controls = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Chunk size (characters): "),
            Span::styled(
                session.chunk_size().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw("    Overlap: "),
            Span::raw(session.chunk_overlap().to_string()),
            Span::raw("    Total chunks: "),
            Span::styled(
                session.chunks().len().to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from("+/- to change size · tiny = many chunks, huge = few chunks")
            .style(Style::default().fg(Color::DarkGray)),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Chunking "));
    f.render_widget(controls, chunks[0]);

    let items: Vec<ListItem> = session
        .chunks()
        .iter()
        .map(|c| {
            ListItem::new(vec![
                Line::from(c.id.as_str()).style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::from(clean_text(&c.text)),
                Line::from(""),
            ])
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Chunks "));
    f.render_widget(list, chunks[1]);
}

pub(crate) fn draw_embed(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let sample = ctx
        .session
        .chunks()
        .first()
        .map(|c| clean_text(&c.text))
        .unwrap_or_else(|| "...Smart-Scan biometric attendance system...".to_string());
    let excerpt: String = sample.chars().take(80).collect();

    let lines = vec![
        Line::from("Meaning → Numbers").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("Text chunk:").style(Style::default().fg(Color::DarkGray)),
        Line::from(format!("\"{excerpt}\"")),
        Line::from(""),
        Line::from("      ↓ embedding model"),
        Line::from(""),
        Line::from("Semantic vector:").style(Style::default().fg(Color::DarkGray)),
        Line::from(vector_bars(&sample, 32)).style(Style::default().fg(Color::Blue)),
        Line::from(""),
        Line::from(
            "The Professor's Analogy: imagine giving every concept a coordinate on a giant map. \
             Similar meanings end up as neighbours!",
        )
        .style(Style::default().fg(Color::Yellow)),
        Line::from(""),
        Line::from("✓ Higher dimension (often 768 or 1536 numbers)"),
        Line::from("✓ Captures context, not just keywords"),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Embedding "));
    f.render_widget(p, area);
}

pub(crate) fn draw_store(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let rows: Vec<Row> = ctx
        .session
        .chunks()
        .iter()
        .take(STORE_PREVIEW_ROWS)
        .map(|c| {
            Row::new(vec![
                Cell::from(c.id.clone()),
                Cell::from(vector_bars(&c.text, 8)).style(Style::default().fg(Color::Blue)),
                Cell::from("university_policy_2025"),
                Cell::from(clean_text(&c.text)),
            ])
        })
        .collect();

    let header = Row::new(vec!["ID", "Vector preview", "Metadata", "Source text"]).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Length(24),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Vector Database "));
    f.render_widget(table, chunks[0]);

    let footer = Paragraph::new("Indexing complete. Your knowledge base is now searchable.")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(footer, chunks[1]);
}
