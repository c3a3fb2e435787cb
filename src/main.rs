//! CLI driver: document one folder end-to-end as a single session.
//!
//! Creates and queues a session, spawns the orchestrator, then polls the
//! registry like any status client would, printing progress transitions.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use sourcedoc::config::{PipelineConfig, SummaryConfig};
use sourcedoc::package::ZipPackager;
use sourcedoc::session::{SessionOrchestrator, SessionRegistry, SessionState};
use sourcedoc::summary::OpenRouterClient;

#[derive(Parser)]
#[command(
    name = "sourcedoc",
    about = "Generate per-file documentation for a source folder"
)]
struct Cli {
    /// Folder to document
    folder: PathBuf,

    /// Name of the generated documentation set; defaults to the folder name
    #[arg(long)]
    name: Option<String>,

    /// Base directory for generated output and artifacts
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Additional folder names to skip
    #[arg(long = "ignore-folder", value_name = "NAME")]
    ignore_folders: Vec<String>,

    /// Additional file names to skip
    #[arg(long = "ignore-file", value_name = "NAME")]
    ignore_files: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env first so OPENROUTER_API_KEY can come from a local file
    let _ = dotenvy::dotenv();

    // Initialize tracing with RUST_LOG env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,sourcedoc=info")),
        )
        .init();

    let cli = Cli::parse();

    let output_name = cli.name.clone().unwrap_or_else(|| {
        cli.folder
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "docs".to_string())
    });

    let mut config = PipelineConfig {
        output_base: cli.output_dir.clone(),
        artifact_dir: cli.output_dir.join("zip"),
        ..PipelineConfig::default()
    };
    config.ignore_folders.extend(cli.ignore_folders.iter().cloned());
    config.ignore_files.extend(cli.ignore_files.iter().cloned());

    let summary_config = SummaryConfig::from_env();
    if summary_config.api_key.is_empty() {
        tracing::warn!(
            "OPENROUTER_API_KEY is not set; summaries will carry the call failure text"
        );
    }
    let client = match OpenRouterClient::new(summary_config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("failed to create summarization client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let registry = Arc::new(SessionRegistry::new());
    let orchestrator = Arc::new(SessionOrchestrator::new(
        registry.clone(),
        client,
        Arc::new(ZipPackager),
        config,
    ));

    let session_id = uuid::Uuid::new_v4().to_string();
    registry.create(&session_id, &format!("{output_name}.zip"));
    registry.update(&session_id, |s| s.mark_queued());

    println!("Session {session_id}: documenting {}", cli.folder.display());

    let handle = tokio::spawn({
        let orchestrator = orchestrator.clone();
        let session_id = session_id.clone();
        let folder = cli.folder.clone();
        let output_name = output_name.clone();
        async move { orchestrator.run(&session_id, &folder, &output_name).await }
    });

    let mut last_reported = 0;
    loop {
        tokio::time::sleep(Duration::from_millis(300)).await;
        let Some(status) = registry.get(&session_id) else {
            break;
        };
        if status.progress.current > last_reported {
            last_reported = status.progress.current;
            println!(
                "[{}/{}] {}",
                status.progress.current, status.progress.total, status.progress.current_file
            );
        }
        if status.status.is_terminal() {
            break;
        }
    }
    let _ = handle.await;

    let Some(status) = registry.get(&session_id) else {
        eprintln!("session vanished from the registry");
        return ExitCode::FAILURE;
    };
    match status.status {
        SessionState::Completed => {
            let artifact = cli
                .output_dir
                .join("zip")
                .join(status.download_name.unwrap_or_default());
            println!("Documentation ready: {}", artifact.display());
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!(
                "session failed: {}",
                status.error.unwrap_or_else(|| "unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}
