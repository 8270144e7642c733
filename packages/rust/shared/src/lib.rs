//! Shared types, error model, and configuration for the RAG simulator.
//!
//! This crate is the foundation depended on by all other workspace crates.
//! It provides:
//! - [`RagSimError`] — the unified error type
//! - Domain types ([`Mode`], [`Step`], [`Chunk`], [`Document`], [`RunId`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, OpenRouterConfig, SimulationConfig, api_key, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_api_key,
};
pub use error::{RagSimError, Result};
pub use types::{Chunk, Document, DocumentKind, Mode, RunId, Step};
