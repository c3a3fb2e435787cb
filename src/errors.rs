//! Error types for the sourcedoc pipeline.

use std::path::PathBuf;

/// Errors raised when a collection root cannot be used at all.
///
/// Per-file faults (unreadable files, non-UTF-8 content) are absorbed by the
/// collector and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("folder not found: {0}")]
    RootNotFound(PathBuf),

    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Errors from a single summarization call.
///
/// Retry and backoff are the orchestrator's concern; the client reports each
/// failure with its underlying cause and nothing more.
#[derive(Debug, thiserror::Error)]
pub enum SummarizationError {
    #[error("summarization request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("summarization API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("summarization response contained no content")]
    EmptyResponse,
}

/// Errors while bundling a session's output directory into an artifact.
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Fatal, session-level errors. Any of these moves the session to `failed`;
/// per-file summarization faults never appear here because they are embedded
/// in the rendered documents instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Collect(#[from] CollectError),

    #[error("failed to write document: {0}")]
    DocumentIo(#[from] std::io::Error),

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("packaging failed: {0}")]
    Package(#[from] PackageError),

    #[error("session cancelled")]
    Cancelled,
}
