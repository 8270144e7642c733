//! Fixed-size chunking and text cleanup for the ingestion steps.

use std::sync::LazyLock;

use regex::Regex;

use ragsim_shared::Chunk;

/// Split `text` into consecutive spans of `size` characters.
///
/// The final span may be shorter. Ids are `c-` plus the 1-based position and
/// every chunk carries `source` as its label. A `size` of zero is treated as 1.
/// Overlap is not applied.
pub fn split_into_chunks(text: &str, source: &str, size: usize) -> Vec<Chunk> {
    let size = size.max(1);
    let chars: Vec<char> = text.chars().collect();

    chars
        .chunks(size)
        .enumerate()
        .map(|(i, span)| Chunk {
            id: format!("c-{}", i + 1),
            text: span.iter().collect(),
            source: source.to_string(),
            score: None,
        })
        .collect()
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn clean_text(text: &str) -> String {
    static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

    WS_RE.replace_all(text.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_scenario_document() {
        let chunks = split_into_chunks("ABCDEFGHIJ", "doc", 4);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(texts, ["ABCD", "EFGH", "IJ"]);
        assert_eq!(ids, ["c-1", "c-2", "c-3"]);
        assert!(chunks.iter().all(|c| c.source == "doc" && c.score.is_none()));
    }

    #[test]
    fn chunk_count_and_lengths_hold_for_many_sizes() {
        let body = crate::catalog::DOCUMENT.content;
        let len = body.chars().count();

        for size in 1..=120 {
            let chunks = split_into_chunks(body, "doc", size);
            assert_eq!(chunks.len(), len.div_ceil(size), "size {size}");

            let (last, rest) = chunks.split_last().expect("non-empty body");
            assert!(rest.iter().all(|c| c.text.chars().count() == size));
            let expected_last = if len % size == 0 { size } else { len % size };
            assert_eq!(last.text.chars().count(), expected_last);

            let joined: String = chunks.iter().map(|c| c.text.as_str()).collect();
            assert_eq!(joined, body, "round-trip failed for size {size}");
        }
    }

    #[test]
    fn size_dividing_evenly_gives_full_last_chunk() {
        let chunks = split_into_chunks("ABCDEFGH", "doc", 4);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].text, "EFGH");
    }

    #[test]
    fn multibyte_text_is_split_on_characters() {
        let chunks = split_into_chunks("héllo wörld", "doc", 3);
        assert_eq!(chunks[0].text, "hél");
        assert_eq!(chunks.last().unwrap().text, "ld");
    }

    #[test]
    fn empty_text_and_zero_size() {
        assert!(split_into_chunks("", "doc", 10).is_empty());
        assert_eq!(split_into_chunks("abc", "doc", 0).len(), 3);
    }

    #[test]
    fn clean_collapses_whitespace() {
        assert_eq!(clean_text("  a\n\n b\t\tc   "), "a b c");
        assert_eq!(clean_text(""), "");
    }
}
