//! Error types for the RAG simulator.
//!
//! Library crates use [`RagSimError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all simulator operations.
#[derive(Debug, thiserror::Error)]
pub enum RagSimError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to the language model.
    #[error("network error: {0}")]
    Network(String),

    /// The language model answered, but not with something usable.
    #[error("generation error: {0}")]
    Generation(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid input (unknown mode name, bad parameter, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RagSimError>;

impl RagSimError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = RagSimError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = RagSimError::validation("unknown mode 'hybrid'");
        assert!(err.to_string().contains("hybrid"));

        let err = RagSimError::Generation("empty choices".into());
        assert_eq!(err.to_string(), "generation error: empty choices");
    }
}
