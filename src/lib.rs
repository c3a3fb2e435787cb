//! sourcedoc: session-scoped source documentation pipeline.
//!
//! For each uploaded source tree the pipeline collects files, extracts
//! structural metadata (imports, functions, classes, docstrings, type hints,
//! constants), asks an external text-generation service for a per-file
//! summary, and renders Markdown + JSON documentation: one isolated session
//! per upload, any number of sessions running concurrently.

pub mod collector;
pub mod config;
pub mod errors;
pub mod extract;
pub mod package;
pub mod render;
pub mod session;
pub mod summary;

pub use collector::{FileRecord, Language};
pub use config::{PipelineConfig, SummaryConfig};
pub use extract::StructuralRecord;
pub use package::{Packager, ZipPackager};
pub use session::{SessionOrchestrator, SessionRegistry, SessionState, SessionStatus};
pub use summary::{OpenRouterClient, SummaryClient};
