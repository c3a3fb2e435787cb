//! Language detection from file extensions.

use serde::{Deserialize, Serialize};
use std::path::Path;

const LANGUAGE_BY_EXTENSION: &[(&str, Language)] = &[
    ("py", Language::Python),
    ("js", Language::Javascript),
    ("ts", Language::Typescript),
    ("java", Language::Java),
    ("go", Language::Go),
    ("rs", Language::Rust),
    ("md", Language::Markdown),
    ("json", Language::Json),
    ("yml", Language::Yaml),
    ("yaml", Language::Yaml),
];

/// Source language tag for a collected file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    Typescript,
    Java,
    Go,
    Rust,
    Markdown,
    Json,
    Yaml,
    Unknown,
}

impl Language {
    /// Detect a language from a file path's extension. A pure table lookup;
    /// unmapped extensions yield `Unknown`.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().map(|e| e.to_string_lossy().to_lowercase()) else {
            return Self::Unknown;
        };
        LANGUAGE_BY_EXTENSION
            .iter()
            .find(|(e, _)| *e == ext.as_str())
            .map(|(_, lang)| *lang)
            .unwrap_or(Self::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Java => "java",
            Self::Go => "go",
            Self::Rust => "rust",
            Self::Markdown => "markdown",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Unknown => "unknown",
        }
    }
}
