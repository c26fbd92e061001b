//! Command-line surface of the `docquery` binary.

use crate::{
    config::get_config,
    console::{self, TerminalView},
    handlers::{Outcome, QueryHandler, UploadHandler},
    metrics::SessionMetrics,
    render::{RenderMode, Renderer},
    selection::{FileSelection, expand_paths},
    transport::{Backend, HttpBackend},
    ui::UploadView,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::BufReader;

/// Parsed command line.
#[derive(Debug, Parser)]
#[command(
    name = "docquery",
    version,
    about = "Upload documents to a Q&A server and ask questions about them"
)]
pub struct Cli {
    /// Server base URL (overrides DOCQUERY_SERVER_URL).
    #[arg(long, global = true)]
    pub server: Option<String>,
    /// Answer rendering: markdown, preformatted or html (overrides DOCQUERY_RENDER_MODE).
    #[arg(long, global = true)]
    pub render: Option<RenderMode>,
    /// Action to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Actions offered by the binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload files; directories expand to the supported files beneath them.
    Upload {
        /// Files or directories to upload.
        paths: Vec<PathBuf>,
    },
    /// Ask one question.
    Query {
        /// Question words, joined with spaces.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Interactive session with both upload and query available.
    Shell,
}

/// Execute the parsed command against the configured server.
///
/// One-shot commands exit non-zero when any submission did not succeed.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = get_config();
    let server = cli.server.unwrap_or_else(|| config.server_url.clone());
    let mode = cli.render.unwrap_or(config.render_mode);
    tracing::info!(server = %server, render_mode = %mode, "Starting");

    let backend = Arc::new(
        HttpBackend::new(&server, config.request_timeout)
            .with_context(|| format!("failed to prepare client for {server}"))?,
    );
    let metrics = Arc::new(SessionMetrics::new());
    let uploads = UploadHandler::new(backend.clone(), metrics.clone());
    let queries = QueryHandler::new(backend, Renderer::new(mode), metrics.clone())
        .with_prefix(config.query_prefix.clone());
    let mut view = TerminalView::stdio();

    let succeeded = match cli.command {
        Command::Upload { paths } => upload_all(&uploads, &paths, &mut view)
            .await
            .into_iter()
            .all(Outcome::is_success),
        Command::Query { text } => queries
            .submit(&text.join(" "), &mut view)
            .await
            .is_success(),
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            console::run_shell(&uploads, &queries, &metrics, stdin, &mut view)
                .await
                .context("failed to read shell input")?;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Upload every file named by `paths`, one submission per file.
///
/// When nothing is left to send (no arguments, or only empty directories) a single submission
/// with an empty selection reports the problem.
pub async fn upload_all<B, V>(
    uploads: &UploadHandler<B>,
    paths: &[PathBuf],
    view: &mut V,
) -> Vec<Outcome>
where
    B: Backend,
    V: UploadView + ?Sized,
{
    let files = expand_paths(paths);
    if files.is_empty() {
        return vec![uploads.submit(&FileSelection::empty(), view).await];
    }

    let mut outcomes = Vec::with_capacity(files.len());
    for file in files {
        outcomes.push(uploads.submit(&FileSelection::single(file), view).await);
    }
    outcomes
}
