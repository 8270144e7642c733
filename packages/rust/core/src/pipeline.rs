//! Step sequences and the transition rules between them.
//!
//! Both pipelines are plain data; transitions work over "the active
//! sequence" and only special-case the baseline shortcuts.

use ragsim_shared::{Mode, Step};

/// Baseline pipeline: the model answers on its own.
pub const BASELINE_FLOW: [Step; 3] = [Step::Question, Step::Generate, Step::Compare];

/// Augmented pipeline: ingestion, retrieval, then generation.
pub const AUGMENTED_FLOW: [Step; 12] = Step::ALL;

/// Ordered steps for `mode`, ending in [`Step::Compare`].
pub fn sequence(mode: Mode) -> &'static [Step] {
    match mode {
        Mode::Baseline => &BASELINE_FLOW,
        Mode::Augmented => &AUGMENTED_FLOW,
    }
}

/// Whether `step` belongs to the pipeline for `mode`.
pub fn contains(mode: Mode, step: Step) -> bool {
    sequence(mode).contains(&step)
}

/// Position of `step` within the pipeline for `mode`.
pub fn position(mode: Mode, step: Step) -> Option<usize> {
    sequence(mode).iter().position(|s| *s == step)
}

/// The step after `current`, or `None` at the terminal step.
pub fn next_step(mode: Mode, current: Step) -> Option<Step> {
    match mode {
        Mode::Baseline => match current {
            Step::Question => Some(Step::Generate),
            Step::Generate => Some(Step::Compare),
            _ => None,
        },
        Mode::Augmented => {
            let idx = position(mode, current)?;
            AUGMENTED_FLOW.get(idx + 1).copied()
        }
    }
}

/// The step before `current`, or `None` at the first step.
///
/// Baseline always falls back to [`Step::Question`].
pub fn previous_step(mode: Mode, current: Step) -> Option<Step> {
    if current == Step::Question {
        return None;
    }
    match mode {
        Mode::Baseline => Some(Step::Question),
        Mode::Augmented => {
            let idx = position(mode, current)?;
            idx.checked_sub(1).map(|i| AUGMENTED_FLOW[i])
        }
    }
}

/// Whether forward navigation is allowed from `current`.
pub fn can_advance(mode: Mode, current: Step, question: &str) -> bool {
    if current == Step::Question && question.is_empty() {
        return false;
    }
    next_step(mode, current).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_shortcut() {
        assert_eq!(next_step(Mode::Baseline, Step::Question), Some(Step::Generate));
        assert_eq!(next_step(Mode::Baseline, Step::Generate), Some(Step::Compare));
        assert_eq!(next_step(Mode::Baseline, Step::Compare), None);
    }

    #[test]
    fn baseline_previous_returns_to_question() {
        assert_eq!(previous_step(Mode::Baseline, Step::Compare), Some(Step::Question));
        assert_eq!(previous_step(Mode::Baseline, Step::Generate), Some(Step::Question));
        assert_eq!(previous_step(Mode::Baseline, Step::Question), None);
    }

    #[test]
    fn augmented_walks_all_twelve_steps() {
        let mut visited = vec![Step::Question];
        let mut current = Step::Question;
        while let Some(next) = next_step(Mode::Augmented, current) {
            visited.push(next);
            current = next;
        }
        assert_eq!(visited, Step::ALL);
    }

    #[test]
    fn augmented_previous_is_strict_predecessor() {
        assert_eq!(previous_step(Mode::Augmented, Step::Chunk), Some(Step::Clean));
        assert_eq!(previous_step(Mode::Augmented, Step::Compare), Some(Step::Generate));
        assert_eq!(previous_step(Mode::Augmented, Step::Question), None);
    }

    #[test]
    fn baseline_sequence_hides_ingestion_steps() {
        for step in [Step::Ingest, Step::Chunk, Step::Retrieval, Step::Rerank, Step::Prompt] {
            assert!(!contains(Mode::Baseline, step));
            assert!(contains(Mode::Augmented, step));
        }
        assert!(contains(Mode::Baseline, Step::Compare));
    }

    #[test]
    fn advance_guards() {
        assert!(!can_advance(Mode::Augmented, Step::Question, ""));
        assert!(can_advance(Mode::Augmented, Step::Question, "q"));
        assert!(!can_advance(Mode::Augmented, Step::Compare, "q"));
        assert!(!can_advance(Mode::Baseline, Step::Compare, "q"));
        // Nothing else gates forward movement.
        assert!(can_advance(Mode::Augmented, Step::Retrieval, ""));
    }
}
