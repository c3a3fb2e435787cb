//! The per-session pipeline driver.
//!
//! One orchestrator run owns exactly one session and drives its batch to a
//! terminal state: collect → extract → summarize (bounded retry) → render →
//! package. Files are processed strictly sequentially within the session (a
//! deliberate throttle on the external summarization service) while any
//! number of sessions run concurrently in their own tasks.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::collector;
use crate::config::PipelineConfig;
use crate::errors::{SessionError, SummarizationError};
use crate::extract;
use crate::package::Packager;
use crate::render;
use crate::session::{Progress, SessionRegistry};
use crate::summary::SummaryClient;

pub struct SessionOrchestrator {
    registry: Arc<SessionRegistry>,
    client: Arc<dyn SummaryClient>,
    packager: Arc<dyn Packager>,
    config: PipelineConfig,
}

impl SessionOrchestrator {
    pub fn new(
        registry: Arc<SessionRegistry>,
        client: Arc<dyn SummaryClient>,
        packager: Arc<dyn Packager>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            registry,
            client,
            packager,
            config,
        }
    }

    /// Drive one session to a terminal state.
    ///
    /// Invoked fire-and-forget by the intake boundary after it queued the
    /// session; by the time this returns, the registry entry is `completed`
    /// or `failed`. Partial output from a failed batch is left in place.
    pub async fn run(&self, session_id: &str, root_folder: &Path, output_name: &str) {
        self.registry.update(session_id, |s| s.mark_processing());

        let cancel = self
            .registry
            .cancel_token(session_id)
            .unwrap_or_default();

        match self
            .run_batch(session_id, root_folder, output_name, &cancel)
            .await
        {
            Ok(download_name) => {
                tracing::info!(session = session_id, artifact = %download_name, "session completed");
                self.registry
                    .update(session_id, |s| s.mark_completed(&download_name));
            }
            Err(e) => {
                tracing::warn!(session = session_id, "session failed: {}", e);
                self.registry
                    .update(session_id, |s| s.mark_failed(&e.to_string()));
            }
        }
    }

    async fn run_batch(
        &self,
        session_id: &str,
        root_folder: &Path,
        output_name: &str,
        cancel: &CancellationToken,
    ) -> Result<String, SessionError> {
        let files = collector::collect(
            root_folder,
            &self.config.ignore_folders,
            &self.config.ignore_files,
        )?;

        // Fixed iteration order established at batch start: reproducible
        // progress counters and document ordering.
        let mut paths: Vec<String> = files.keys().cloned().collect();
        paths.sort();
        let total = paths.len();

        let output_root = self.config.output_base.join(session_id).join(output_name);
        let md_dir = output_root.join("md");
        let json_dir = output_root.join("json");
        std::fs::create_dir_all(&md_dir)?;
        std::fs::create_dir_all(&json_dir)?;

        tracing::info!(session = session_id, files = total, "beginning summarization batch");
        self.registry.update(session_id, |s| {
            s.set_progress(Progress::new(0, total, "Starting..."));
        });

        for (index, relative_path) in paths.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(SessionError::Cancelled);
            }
            let Some(file) = files.get(relative_path) else {
                continue;
            };

            let mut record = extract::extract(&file.content);
            record.file_name = relative_path.clone();
            record.summary = Some(self.summarize_with_retry(&file.content, cancel).await?);

            let markdown = render::render_markdown(&record);
            let json = render::render_json(&record)?;
            let stem = render::sanitize_relative_path(relative_path);
            render::persist_pair(
                &md_dir.join(format!("{stem}.md")),
                &json_dir.join(format!("{stem}.json")),
                &markdown,
                &json,
            )?;

            let current = index + 1;
            self.registry.update(session_id, |s| {
                s.set_progress(Progress::new(current, total, relative_path));
            });
            tracing::debug!(
                session = session_id,
                "processed {}/{}: {}",
                current,
                total,
                relative_path
            );
        }

        let artifact_stem = format!("{session_id}_{output_name}");
        self.packager
            .package(&output_root, &self.config.artifact_dir, &artifact_stem)?;
        Ok(format!("{artifact_stem}.zip"))
    }

    /// Summarize one file with a bounded retry loop.
    ///
    /// Up to `max_attempts` calls with a fixed cooperative delay between
    /// them; the delay races the session's cancellation token so an
    /// abandoned session never leaks a sleeping task. On exhaustion the last
    /// error's message becomes the summary text; the failure must be
    /// visible in the document itself, never thrown past the file. Fails
    /// only on cancellation.
    async fn summarize_with_retry(
        &self,
        source: &str,
        cancel: &CancellationToken,
    ) -> Result<String, SessionError> {
        let mut last_error: Option<SummarizationError> = None;

        for attempt in 1..=self.config.max_attempts {
            if attempt > 1 {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(SessionError::Cancelled),
                    _ = tokio::time::sleep(self.config.retry_delay) => {}
                }
            }
            match self.client.summarize(source).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max = self.config.max_attempts,
                        "summarization attempt failed: {}",
                        e
                    );
                    last_error = Some(e);
                }
            }
        }

        Ok(last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "summarization produced no result".to_string()))
    }
}
