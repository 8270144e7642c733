//! Keyword-overlap scoring used as a stand-in for vector similarity.
//!
//! This is deliberately naive: the visualizer labels the step "cosine
//! similarity", but the numbers come from substring matches.

use ragsim_shared::Chunk;

/// Score added for each question keyword found in a chunk.
pub const KEYWORD_WEIGHT: f64 = 0.2;

/// Upper bound on any chunk score.
pub const MAX_SCORE: f64 = 0.98;

/// Lowercased keywords of `question`, split on single spaces.
///
/// Runs of spaces and leading or trailing spaces yield empty keywords,
/// which match every chunk.
pub fn keywords(question: &str) -> Vec<String> {
    question
        .to_lowercase()
        .split(' ')
        .map(str::to_string)
        .collect()
}

/// Score a single chunk text against pre-lowercased keywords.
pub fn score_text(text: &str, keywords: &[String]) -> f64 {
    let haystack = text.to_lowercase();
    let mut score = 0.0;
    for kw in keywords {
        if haystack.contains(kw.as_str()) {
            score += KEYWORD_WEIGHT;
        }
    }
    score.min(MAX_SCORE)
}

/// Score every chunk, sort by descending score and keep the first `top_k`.
///
/// The sort is stable, so chunks with equal scores keep document order.
pub fn retrieve(question: &str, chunks: &[Chunk], top_k: usize) -> Vec<Chunk> {
    let kws = keywords(question);

    let mut scored: Vec<Chunk> = chunks
        .iter()
        .map(|c| Chunk {
            score: Some(score_text(&c.text, &kws)),
            ..c.clone()
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .unwrap_or(0.0)
            .total_cmp(&a.score.unwrap_or(0.0))
    });
    scored.truncate(top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::split_into_chunks;

    fn chunk(id: &str, text: &str) -> Chunk {
        Chunk {
            id: id.into(),
            text: text.into(),
            source: "doc".into(),
            score: None,
        }
    }

    #[test]
    fn grant_amount_scenario() {
        let chunks = vec![
            chunk("c-1", "the AI innovation grant is $500"),
            chunk("c-2", "library hours are 9 to 5"),
        ];
        let out = retrieve("grant amount", &chunks, 2);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].id, "c-1");
        assert!((out[0].score.unwrap() - 0.2).abs() < 1e-9);
        assert_eq!(out[1].id, "c-2");
        assert_eq!(out[1].score, Some(0.0));
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let kws = keywords("GRANT Lib");
        assert_eq!(kws, ["grant", "lib"]);
        let score = score_text("The Grant covers LIBRARY fees", &kws);
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn score_is_clamped() {
        let kws = keywords("a b c d e f g");
        assert_eq!(score_text("abcdefg", &kws), MAX_SCORE);
    }

    #[test]
    fn ties_keep_document_order() {
        let chunks = vec![
            chunk("c-1", "nothing"),
            chunk("c-2", "grant"),
            chunk("c-3", "also nothing"),
            chunk("c-4", "grant again"),
        ];
        let ids: Vec<String> = retrieve("grant", &chunks, 4)
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, ["c-2", "c-4", "c-1", "c-3"]);
    }

    #[test]
    fn properties_hold_over_document() {
        let doc = crate::catalog::DOCUMENT;
        for size in [50, 100, 300, 500, 1000] {
            let chunks = split_into_chunks(doc.content, doc.name, size);
            for question in crate::catalog::SAMPLE_QUESTIONS {
                for top_k in 0..=6 {
                    let out = retrieve(question, &chunks, top_k);
                    assert_eq!(out.len(), top_k.min(chunks.len()));
                    let scores: Vec<f64> = out.iter().map(|c| c.score.unwrap()).collect();
                    assert!(scores.iter().all(|s| (0.0..=MAX_SCORE).contains(s)));
                    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
                }
            }
        }
    }

    #[test]
    fn empty_question_matches_every_chunk_once() {
        let chunks = vec![chunk("c-1", "x"), chunk("c-2", "y")];
        assert_eq!(keywords(""), [""]);
        let out = retrieve("", &chunks, 3);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| (c.score.unwrap() - 0.2).abs() < 1e-9));
    }

    #[test]
    fn trailing_space_adds_an_empty_keyword() {
        let chunks = vec![
            chunk("c-1", "the AI innovation grant is $500"),
            chunk("c-2", "library hours are 9 to 5"),
        ];
        assert_eq!(keywords("grant "), ["grant", ""]);
        let out = retrieve("grant ", &chunks, 2);
        assert_eq!(out[0].id, "c-1");
        assert!((out[0].score.unwrap() - 0.4).abs() < 1e-9);
        assert_eq!(out[1].id, "c-2");
        assert!((out[1].score.unwrap() - 0.2).abs() < 1e-9);
    }
}
