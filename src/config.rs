//! Runtime configuration for the pipeline and the summarization client.
//!
//! Plain structs with defaults mirroring the stock deployment; the binary
//! loads `.env` via dotenvy before reading overrides, so `OPENROUTER_API_KEY`
//! can live in either the process environment or a local `.env` file.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

/// Default folder names never descended into during collection.
pub const DEFAULT_IGNORE_FOLDERS: &[&str] =
    &["venv", "__pycache__", "node_modules", ".git", "output"];

/// Default file names skipped during collection.
pub const DEFAULT_IGNORE_FILES: &[&str] = &[".env", ".gitignore"];

/// Settings for the OpenRouter-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// API base, e.g. `https://openrouter.ai/api/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// System prompt sent with every summarization request.
    pub system_prompt: String,
    /// Per-request timeout for the HTTP client.
    pub timeout: Duration,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            api_key: String::new(),
            model: "mistralai/mistral-nemo".to_string(),
            system_prompt: "You are a helpful assistant that summarizes source code files."
                .to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl SummaryConfig {
    /// Build a config from the environment: `OPENROUTER_API_KEY` (required
    /// for real calls), with optional `OPENROUTER_BASE_URL` and
    /// `OPENROUTER_MODEL` overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("OPENROUTER_API_KEY") {
            config.api_key = key;
        }
        if let Ok(base) = std::env::var("OPENROUTER_BASE_URL") {
            config.base_url = base;
        }
        if let Ok(model) = std::env::var("OPENROUTER_MODEL") {
            config.model = model;
        }
        config
    }
}

/// Settings for one orchestrator run: retry policy, output locations and
/// collection ignore-lists.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum summarization attempts per file.
    pub max_attempts: u32,
    /// Fixed delay between summarization attempts.
    pub retry_delay: Duration,
    /// Base directory for per-session output trees.
    pub output_base: PathBuf,
    /// Directory receiving packaged artifacts.
    pub artifact_dir: PathBuf,
    /// Directory names pruned before descent.
    pub ignore_folders: HashSet<String>,
    /// File names skipped entirely.
    pub ignore_files: HashSet<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(5),
            output_base: PathBuf::from("output"),
            artifact_dir: PathBuf::from("output").join("zip"),
            ignore_folders: DEFAULT_IGNORE_FOLDERS.iter().map(|s| s.to_string()).collect(),
            ignore_files: DEFAULT_IGNORE_FILES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
