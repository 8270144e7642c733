//! "User Question" view — question input and sample questions.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use ragsim_core::catalog::SAMPLE_QUESTIONS;

use super::ViewContext;

pub(crate) fn draw(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5), // Question input
            Constraint::Length(2), // Hint
            Constraint::Min(1),    // Samples
        ])
        .split(area);

    let question = ctx.session.question();
    let input_style = if ctx.editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let body = if question.is_empty() && !ctx.editing {
        Text::from("Ask anything about the University of Excellence policy...")
            .style(Style::default().fg(Color::DarkGray))
    } else if ctx.editing {
        Text::from(format!("{question}▏"))
    } else {
        Text::from(question)
    };
    let input = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" What do you want to know? ")
            .border_style(input_style),
    );
    f.render_widget(input, chunks[0]);

    let hint = if ctx.editing {
        "Type your question · Enter/Esc to finish"
    } else {
        "e to edit · s to use the next sample question · n to continue"
    };
    let hint_p = Paragraph::new(hint)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(hint_p, chunks[1]);

    let items: Vec<ListItem> = SAMPLE_QUESTIONS
        .iter()
        .map(|q| {
            let style = if *q == question {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(format!("• {q}")).style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Sample questions "),
    );
    f.render_widget(list, chunks[2]);
}
