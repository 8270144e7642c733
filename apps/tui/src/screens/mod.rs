//! Step views.
//!
//! Each pipeline step renders into the center panel. Views are read-only:
//! all input handling lives in `app`.

mod ingestion;
mod query;
mod question;
mod results;

use ratatui::prelude::*;

use ragsim_core::Session;
use ragsim_shared::Step;

/// What a step view needs to render.
pub(crate) struct ViewContext<'a> {
    pub session: &'a Session,
    /// Whether the question field is being edited.
    pub editing: bool,
    /// Frame counter for the loading spinner.
    pub tick: usize,
}

pub(crate) fn draw(f: &mut Frame, area: Rect, ctx: &ViewContext<'_>) {
    match ctx.session.step() {
        Step::Question => question::draw(f, area, ctx),
        Step::Ingest => ingestion::draw_ingest(f, area, ctx),
        Step::Clean => ingestion::draw_clean(f, area, ctx),
        Step::Chunk => ingestion::draw_chunks(f, area, ctx),
        Step::Embed => ingestion::draw_embed(f, area, ctx),
        Step::Store => ingestion::draw_store(f, area, ctx),
        Step::QueryEmbed => query::draw_query_embed(f, area, ctx),
        Step::Retrieval => query::draw_retrieval(f, area, ctx),
        Step::Rerank => query::draw_rerank(f, area, ctx),
        Step::Prompt => query::draw_prompt(f, area, ctx),
        Step::Generate => results::draw_generate(f, area, ctx),
        Step::Compare => results::draw_compare(f, area, ctx),
    }
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use ragsim_core::generation::ERROR_ANSWER;
    use ragsim_shared::{Mode, SimulationConfig};

    use super::*;

    /// Render the current step view and return the screen as text rows.
    fn render(session: &Session) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(200, 50)).expect("terminal");
        let ctx = ViewContext {
            session,
            editing: false,
            tick: 0,
        };
        terminal
            .draw(|f| {
                let area = f.area();
                draw(f, area, &ctx);
            })
            .expect("draw");

        let buf = terminal.backend().buffer();
        buf.content
            .chunks(usize::from(buf.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn contains(screen: &[String], needle: &str) -> bool {
        screen.iter().any(|row| row.contains(needle))
    }

    #[test]
    fn compare_renders_failed_generation_text() {
        let mut session = Session::new(&SimulationConfig::default());
        session.set_question("What is the grant amount?");
        assert!(session.advance());
        let request = session.reconcile().expect("generation request");
        assert!(session.complete_generation(&request, ERROR_ANSWER.to_string()));
        assert!(session.advance());
        assert_eq!(session.step(), Step::Compare);

        let screen = render(&session);
        assert!(contains(&screen, ERROR_ANSWER));
        assert!(contains(&screen, "Wait for Mode B generation..."));
        assert!(contains(&screen, "Key Takeaways"));
    }

    #[test]
    fn every_step_renders_with_empty_derived_state() {
        for mode in [Mode::Baseline, Mode::Augmented] {
            for step in Step::ALL {
                let mut session = Session::new(&SimulationConfig::default());
                session.reset(mode);
                if !session.jump(step) {
                    continue;
                }
                assert!(session.chunks().is_empty());
                let screen = render(&session);
                assert!(screen.iter().any(|row| !row.trim().is_empty()), "{mode} {step}");
            }
        }
    }
}
