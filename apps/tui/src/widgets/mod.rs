//! Reusable TUI widgets.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use ragsim_core::catalog::step_info;
use ragsim_core::pipeline;
use ragsim_core::Session;
use ragsim_shared::{Mode, Step};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Bottom status bar.
pub(crate) fn status_bar(msg: &str) -> Paragraph<'_> {
    Paragraph::new(format!(" {msg}")).style(Style::default().bg(Color::DarkGray).fg(Color::White))
}

/// Spinner frame for the loading indicator.
pub(crate) fn spinner(tick: usize) -> &'static str {
    SPINNER[tick % SPINNER.len()]
}

/// A fake embedding rendered as a row of bars, stable for the same text.
pub(crate) fn vector_bars(seed: &str, width: usize) -> String {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    (0..width)
        .map(|i| {
            for b in seed.bytes().chain((i as u64).to_le_bytes()) {
                h ^= u64::from(b);
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
            BARS[(h % BARS.len() as u64) as usize]
        })
        .collect()
}

/// Left sidebar listing the steps of the active pipeline.
pub(crate) fn pipeline_list(session: &Session, cursor: usize) -> List<'static> {
    let current = session.step();
    let current_pos = pipeline::position(session.mode(), current);

    let items: Vec<ListItem> = session
        .steps()
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let active = *step == current;
            // Only the full pipeline shows completion ticks.
            let completed = session.mode() == Mode::Augmented
                && *step != Step::Compare
                && current_pos.is_some_and(|pos| pos > i);

            let (marker, style) = if active {
                (
                    "●",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else if completed {
                ("✓", Style::default().fg(Color::Green))
            } else {
                ("○", Style::default().fg(Color::DarkGray))
            };
            let prefix = if i == cursor { "▸ " } else { "  " };

            ListItem::new(format!("{prefix}{marker} {}", step_info(*step).title)).style(style)
        })
        .collect();

    List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Pipeline Flow "),
    )
}

/// Right-hand "What's happening?" panel for `step`.
pub(crate) fn explanation(step: Step) -> Paragraph<'static> {
    let info = step_info(step);
    let lines = vec![
        Line::from(info.title).style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from(info.description),
        Line::from(""),
        Line::from("Tools / Technologies:").style(
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(info.tools.join(" · ")).style(Style::default().fg(Color::Cyan)),
    ];

    Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" What's Happening? "),
    )
}

/// Previous / Next controls, dimmed when disabled.
pub(crate) fn nav_bar(session: &Session) -> Paragraph<'static> {
    let enabled = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    let next_label = if session.step() == Step::Generate {
        "View Results"
    } else {
        "Next Step"
    };

    let line = Line::from(vec![
        Span::styled(
            "← [p] Previous",
            if session.can_go_back() { enabled } else { disabled },
        ),
        Span::raw("      "),
        Span::styled(
            format!("[n] {next_label} →"),
            if session.can_advance() {
                enabled.fg(Color::Cyan)
            } else {
                disabled
            },
        ),
    ]);

    Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_bars_are_stable() {
        let a = vector_bars("Smart-Scan", 12);
        assert_eq!(a, vector_bars("Smart-Scan", 12));
        assert_eq!(a.chars().count(), 12);
        assert_ne!(a, vector_bars("library", 12));
    }

    #[test]
    fn spinner_wraps() {
        assert_eq!(spinner(0), spinner(SPINNER.len()));
    }
}
