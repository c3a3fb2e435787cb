//! Process-wide session registry.
//!
//! The pipeline's only shared mutable state. Backed by a lock-free DashMap;
//! single-writer-per-key discipline holds by construction because the
//! orchestrator that owns a session is the only caller of [`SessionRegistry::update`]
//! for that key. Reads are last-write-wins snapshots, which is exactly right
//! for a polling surface with one writer.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio_util::sync::CancellationToken;

use super::SessionStatus;

struct SessionEntry {
    status: SessionStatus,
    cancel: CancellationToken,
    /// When the session reached a terminal state; drives eviction.
    terminal_at: Option<Instant>,
}

/// Concurrency-safe session table, injected wherever sessions are created,
/// driven or polled.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a new session in `uploading` state. Called before any
    /// background work starts, so a status query issued immediately after
    /// upload acceptance never finds a missing key.
    pub fn create(&self, session_id: &str, filename: &str) -> SessionStatus {
        let status = SessionStatus::new(session_id, filename);
        self.sessions.insert(
            session_id.to_string(),
            SessionEntry {
                status: status.clone(),
                cancel: CancellationToken::new(),
                terminal_at: None,
            },
        );
        status
    }

    /// Snapshot of one session's status. `None` is a distinct observable
    /// outcome from any live state.
    pub fn get(&self, session_id: &str) -> Option<SessionStatus> {
        self.sessions.get(session_id).map(|e| e.status.clone())
    }

    /// Snapshots of every known session.
    pub fn list(&self) -> Vec<SessionStatus> {
        self.sessions.iter().map(|e| e.status.clone()).collect()
    }

    /// Apply a mutation to one session's status. Returns false for an
    /// unknown session.
    pub fn update(&self, session_id: &str, mutate: impl FnOnce(&mut SessionStatus)) -> bool {
        let Some(mut entry) = self.sessions.get_mut(session_id) else {
            return false;
        };
        mutate(&mut entry.status);
        if entry.status.status.is_terminal() && entry.terminal_at.is_none() {
            entry.terminal_at = Some(Instant::now());
        }
        true
    }

    /// The cancellation token observed by the session's per-file loop.
    pub fn cancel_token(&self, session_id: &str) -> Option<CancellationToken> {
        self.sessions.get(session_id).map(|e| e.cancel.clone())
    }

    /// Request cooperative cancellation of a running session.
    pub fn cancel(&self, session_id: &str) -> bool {
        match self.sessions.get(session_id) {
            Some(entry) => {
                entry.cancel.cancel();
                true
            }
            None => false,
        }
    }

    /// Drop sessions that reached a terminal state more than `ttl` ago.
    /// Should be called periodically; returns the eviction count.
    pub fn evict_expired(&self, ttl: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| entry.terminal_at.is_none_or(|t| t.elapsed() < ttl));
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
