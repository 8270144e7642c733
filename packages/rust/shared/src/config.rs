//! Application configuration for the RAG simulator.
//!
//! User config lives at `~/.ragsim/ragsim.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{RagSimError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "ragsim.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".ragsim";

// ---------------------------------------------------------------------------
// Config structs (matching ragsim.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Language model endpoint settings.
    #[serde(default)]
    pub openrouter: OpenRouterConfig,

    /// Initial simulation parameters for every run.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// `[openrouter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used for both baseline and augmented answers.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout. A timed-out call resolves to the error answer.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OpenRouterConfig {
    /// Full chat-completions endpoint derived from `base_url`.
    pub fn endpoint(&self) -> Result<Url> {
        let raw = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        Url::parse(&raw).map_err(|e| {
            RagSimError::config(format!("invalid base_url '{}': {e}", self.base_url))
        })
    }
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".into()
}
fn default_model() -> String {
    "google/gemini-2.5-flash".into()
}
fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_timeout_secs() -> u64 {
    60
}

/// `[simulation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Characters per chunk.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared between neighbouring chunks. Shown, never applied.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Number of chunks kept after scoring.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Whether the reranker panel starts enabled.
    #[serde(default = "default_true")]
    pub rerank: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            rerank: true,
        }
    }
}

fn default_chunk_size() -> usize {
    500
}
fn default_chunk_overlap() -> usize {
    50
}
fn default_top_k() -> usize {
    3
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.ragsim/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| RagSimError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.ragsim/ragsim.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| RagSimError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| RagSimError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| RagSimError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| RagSimError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| RagSimError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read the API key from the env var named in the config.
pub fn api_key(config: &OpenRouterConfig) -> Result<String> {
    let var_name = &config.api_key_env;
    match std::env::var(var_name) {
        Ok(val) if !val.is_empty() => Ok(val),
        _ => Err(RagSimError::config(format!(
            "API key not found. Set the {var_name} environment variable.\n\
             Get a key at https://openrouter.ai/keys"
        ))),
    }
}

/// Check that the API key env var is set and non-empty.
pub fn validate_api_key(config: &AppConfig) -> Result<()> {
    api_key(&config.openrouter).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("chunk_size"));
        assert!(toml_str.contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.simulation.chunk_size, 500);
        assert_eq!(parsed.simulation.chunk_overlap, 50);
        assert_eq!(parsed.simulation.top_k, 3);
        assert!(parsed.simulation.rerank);
        assert_eq!(parsed.openrouter.timeout_secs, 60);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[simulation]
top_k = 5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.simulation.top_k, 5);
        assert_eq!(config.simulation.chunk_size, 500);
        assert_eq!(config.openrouter.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let mut config = OpenRouterConfig::default();
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
        config.base_url = "http://127.0.0.1:9000/v1/".into();
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:9000/v1/chat/completions"
        );
        config.base_url = "not a url".into();
        assert!(config.endpoint().is_err());
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.openrouter.api_key_env = "RAGSIM_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_key(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("API key not found"));
    }
}
