//! Summarization client boundary.
//!
//! The trait is the whole contract: one call, one summary or one error with
//! its cause. Retry and backoff live in the session orchestrator, because backoff
//! policy is a pipeline concern, not a client concern.

mod openrouter;

pub use openrouter::OpenRouterClient;

use async_trait::async_trait;

use crate::errors::SummarizationError;

/// Produces a natural-language summary of one file's source text.
#[async_trait]
pub trait SummaryClient: Send + Sync {
    async fn summarize(&self, source: &str) -> Result<String, SummarizationError>;
}
