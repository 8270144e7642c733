//! Generation and comparison views.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use ragsim_shared::Mode;

use super::ViewContext;
use crate::widgets::spinner;

pub(crate) fn draw_generate(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let session = ctx.session;
    let mode = session.mode();
    let subtitle = match mode {
        Mode::Baseline => "Zero-Shot (Training Data Only)",
        Mode::Augmented => "Context-Grounded (RAG)",
    };

    let mut lines = vec![
        Line::from("LLM Generation").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(subtitle).style(Style::default().fg(Color::DarkGray)),
        Line::from(""),
    ];

    if session.is_loading() {
        lines.push(
            Line::from(format!("{} LLM is thinking...", spinner(ctx.tick))).style(
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
        );
    } else {
        lines.extend(
            session
                .answer(mode)
                .lines()
                .map(|l| Line::from(l.to_string())),
        );
    }

    if mode == Mode::Augmented {
        let ids: Vec<&str> = session.retrieved().iter().map(|c| c.id.as_str()).collect();
        lines.push(Line::from(""));
        lines.push(
            Line::from(format!("Evidence supplied: {}", ids.join(", ")))
                .style(Style::default().fg(Color::Green)),
        );
    }

    let source = match mode {
        Mode::Baseline => "Standard training parameters",
        Mode::Augmented => "Retrieved Context Injection",
    };
    lines.push(Line::from(""));
    lines.push(
        Line::from(format!("Response generated using {source}"))
            .style(Style::default().fg(Color::DarkGray)),
    );

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Answer "));
    f.render_widget(p, area);
}

pub(crate) fn draw_compare(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let session = ctx.session;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(7),
        ])
        .split(area);

    let question = Paragraph::new(session.question())
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" The RAG Verdict "),
        );
    f.render_widget(question, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    for (mode, col, color, placeholder, caveat) in [
        (
            Mode::Baseline,
            cols[0],
            Color::Red,
            "Wait for Mode A generation...",
            "Might hallucinate or admit ignorance for private data.",
        ),
        (
            Mode::Augmented,
            cols[1],
            Color::Green,
            "Wait for Mode B generation...",
            "Grounded in University of Excellence 2025 Policy.",
        ),
    ] {
        let answer = session.answer(mode);
        let mut body = if answer.is_empty() {
            Text::from(placeholder).style(Style::default().fg(Color::DarkGray))
        } else {
            Text::from(answer)
        };
        body.push_line(Line::from(""));
        body.push_line(Line::from(caveat).style(Style::default().fg(color)));
        let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", mode.label())),
        );
        f.render_widget(p, col);
    }

    let benefits = Paragraph::new(vec![
        Line::from("Key Takeaways").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from("• Accuracy: RAG gives 'open-book' access to your private files, reducing guessing."),
        Line::from("• Citations: answers are traceable back to specific sections of the source."),
        Line::from("• Security: use internal documents without training a public model on them."),
        Line::from("• Up-to-Date: no re-training, just add new chunks to the vector DB."),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(benefits, rows[2]);
}
