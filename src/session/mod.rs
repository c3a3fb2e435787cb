//! Session state and the per-session pipeline.
//!
//! A session is one end-to-end processing run for a single uploaded archive.
//! Its status record transitions linearly (`uploading`, `queued`, `processing`,
//! then `completed` or `failed`) and is mutated only by the orchestrator that owns
//! the session, while any number of pollers read snapshots concurrently.

pub mod orchestrator;
pub mod registry;


pub use orchestrator::SessionOrchestrator;
pub use registry::SessionRegistry;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Upload accepted, archive not yet extracted.
    Uploading,
    /// Archive extracted and waiting for the orchestrator to start.
    Queued,
    /// The batch is running.
    Processing,
    /// Every file was processed and the output packaged.
    Completed,
    /// An unrecoverable condition aborted the batch.
    Failed,
}

impl SessionState {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Live progress of a running batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub current_file: String,
    /// Rounded percentage, 0..=100.
    pub percentage: u8,
}

impl Progress {
    pub fn new(current: usize, total: usize, current_file: &str) -> Self {
        let percentage = if total > 0 {
            ((current as f64 / total as f64) * 100.0).round() as u8
        } else {
            0
        };
        Self {
            current,
            total,
            current_file: current_file.to_string(),
            percentage,
        }
    }
}

/// The status record polled by clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub session_id: String,
    pub status: SessionState,
    /// Name of the uploaded archive.
    pub filename: String,
    pub progress: Progress,
    /// Artifact name, set once the session completes.
    pub download_name: Option<String>,
    /// Error message, set once the session fails.
    pub error: Option<String>,
}

impl SessionStatus {
    /// A fresh record in `uploading` state.
    pub fn new(session_id: &str, filename: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            status: SessionState::Uploading,
            filename: filename.to_string(),
            progress: Progress::default(),
            download_name: None,
            error: None,
        }
    }

    /// `uploading → queued`: set by the intake boundary once the archive is
    /// extracted and the candidate folder located.
    pub fn mark_queued(&mut self) {
        if self.status == SessionState::Uploading {
            self.status = SessionState::Queued;
        }
    }

    /// `queued → processing`: set by the orchestrator as the batch starts.
    pub fn mark_processing(&mut self) {
        if self.status == SessionState::Queued {
            self.status = SessionState::Processing;
        }
    }

    pub fn mark_completed(&mut self, download_name: &str) {
        if !self.status.is_terminal() {
            self.status = SessionState::Completed;
            self.download_name = Some(download_name.to_string());
        }
    }

    pub fn mark_failed(&mut self, error: &str) {
        if !self.status.is_terminal() {
            self.status = SessionState::Failed;
            self.error = Some(error.to_string());
        }
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = progress;
    }
}
