//! Core domain types for the RAG simulation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RagSimError;

// ---------------------------------------------------------------------------
// RunId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper identifying one simulation run (time-sortable).
///
/// A fresh id is minted every time the run state is reset, so log lines
/// from different runs can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Generate a new time-sortable run identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Which pipeline the simulation walks through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// LLM only: the model answers from its training data.
    #[default]
    Baseline,
    /// LLM + retrieval over the private document.
    Augmented,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baseline => "baseline",
            Self::Augmented => "augmented",
        }
    }

    /// Label shown on the mode switcher.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Baseline => "Mode A: LLM Only",
            Self::Augmented => "Mode B: LLM + RAG",
        }
    }

    /// Breadcrumb heading for the pipeline being shown.
    pub fn pipeline_name(&self) -> &'static str {
        match self {
            Self::Baseline => "Standard LLM Baseline",
            Self::Augmented => "Advanced RAG Pipeline",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = RagSimError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" | "llm-only" | "a" => Ok(Self::Baseline),
            "augmented" | "rag" | "b" => Ok(Self::Augmented),
            other => Err(RagSimError::validation(format!(
                "unknown mode '{other}': expected 'baseline' or 'augmented'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// A named stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Question,
    // Ingestion
    Ingest,
    Clean,
    Chunk,
    Embed,
    Store,
    // Live query
    QueryEmbed,
    Retrieval,
    Rerank,
    Prompt,
    Generate,
    Compare,
}

impl Step {
    /// Every step, in pipeline order.
    pub const ALL: [Step; 12] = [
        Step::Question,
        Step::Ingest,
        Step::Clean,
        Step::Chunk,
        Step::Embed,
        Step::Store,
        Step::QueryEmbed,
        Step::Retrieval,
        Step::Rerank,
        Step::Prompt,
        Step::Generate,
        Step::Compare,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Ingest => "ingest",
            Self::Clean => "clean",
            Self::Chunk => "chunk",
            Self::Embed => "embed",
            Self::Store => "store",
            Self::QueryEmbed => "query_embed",
            Self::Retrieval => "retrieval",
            Self::Rerank => "rerank",
            Self::Prompt => "prompt",
            Self::Generate => "generate",
            Self::Compare => "compare",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Chunk
// ---------------------------------------------------------------------------

/// A slice of source text used as a retrieval unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Stable identifier (`c-1`, `c-2`, ...).
    pub id: String,
    /// The text span.
    pub text: String,
    /// Name of the document the span came from.
    pub source: String,
    /// Relevance score, present only after retrieval scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Document type label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    #[serde(rename = "PDF")]
    Pdf,
    #[serde(rename = "DOCX")]
    Docx,
    Policy,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => f.write_str("PDF"),
            Self::Docx => f.write_str("DOCX"),
            Self::Policy => f.write_str("Policy"),
        }
    }
}

/// Static reference content ingested by the simulation.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: &'static str,
    pub name: &'static str,
    pub content: &'static str,
    pub kind: DocumentKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("baseline".parse::<Mode>().unwrap(), Mode::Baseline);
        assert_eq!("RAG".parse::<Mode>().unwrap(), Mode::Augmented);
        assert_eq!("b".parse::<Mode>().unwrap(), Mode::Augmented);
        let err = "hybrid".parse::<Mode>().unwrap_err();
        assert!(err.to_string().contains("unknown mode"));
    }

    #[test]
    fn default_mode_is_baseline() {
        assert_eq!(Mode::default(), Mode::Baseline);
    }

    #[test]
    fn step_order_starts_and_ends_correctly() {
        assert_eq!(Step::ALL.first(), Some(&Step::Question));
        assert_eq!(Step::ALL.last(), Some(&Step::Compare));
        assert_eq!(Step::QueryEmbed.to_string(), "query_embed");
    }

    #[test]
    fn chunk_without_score_omits_field() {
        let chunk = Chunk {
            id: "c-1".into(),
            text: "hello".into(),
            source: "doc".into(),
            score: None,
        };
        let json = serde_json::to_string(&chunk).expect("serialize");
        assert!(!json.contains("score"));

        let scored = Chunk {
            score: Some(0.4),
            ..chunk
        };
        let json = serde_json::to_string(&scored).expect("serialize");
        assert!(json.contains(r#""score":0.4"#));
    }

    #[test]
    fn run_ids_are_unique() {
        assert_ne!(RunId::new(), RunId::new());
    }
}
