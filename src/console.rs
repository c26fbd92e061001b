//! Terminal presentation and the interactive shell.
//!
//! [`TerminalView`] draws the form elements as lines of text: status changes and answers go to
//! the main writer (stdout), the loading indicator to the side writer (stderr) so piped output
//! only carries results.

use crate::{
    handlers::{QueryHandler, UploadHandler},
    metrics::SessionMetrics,
    selection::FileSelection,
    transport::Backend,
    ui::{Content, ContainerClass, QueryView, StatusClass, Tone, UploadView},
};
use std::io::{self, Stderr, Stdout, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const LOADING_TEXT: &str = "Waiting for response...";
const HELP_TEXT: &str = "Type a question and press enter.\n\
    :upload PATH   upload a file\n\
    :stats         show session counters\n\
    :help          show this help\n\
    :quit          leave the shell";

/// View that renders form elements to a pair of writers.
pub struct TerminalView<O, E> {
    out: O,
    side: E,
    response_visible: bool,
}

impl TerminalView<Stdout, Stderr> {
    /// View over the process's standard output and error.
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> TerminalView<O, E> {
    /// View over arbitrary writers.
    pub fn new(out: O, side: E) -> Self {
        Self {
            out,
            side,
            response_visible: true,
        }
    }

    /// Consume the view, returning its writers.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.side)
    }

    /// Print a line on the main writer.
    pub fn print_line(&mut self, line: &str) {
        if let Err(error) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!(%error, "Failed to write to terminal");
        }
    }

    fn print_side(&mut self, line: &str) {
        if let Err(error) = writeln!(self.side, "{line}").and_then(|()| self.side.flush()) {
            tracing::warn!(%error, "Failed to write to terminal");
        }
    }

    fn prompt(&mut self) {
        if let Err(error) = write!(self.side, "> ").and_then(|()| self.side.flush()) {
            tracing::warn!(%error, "Failed to write prompt");
        }
    }
}

impl<O: Write, E: Write> UploadView for TerminalView<O, E> {
    fn set_status(&mut self, class: StatusClass, text: &str) {
        self.print_line(&format!("[{class}] {text}"));
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        tracing::trace!(enabled, "Upload control toggled");
    }
}

impl<O: Write, E: Write> QueryView for TerminalView<O, E> {
    fn set_content(&mut self, content: Content, class: ContainerClass) {
        if !self.response_visible {
            tracing::debug!("Content set while response hidden");
        }
        match class.tone {
            Tone::Error => self.print_line(&format!("[error] {}", content.as_str())),
            Tone::Success => self.print_line(content.as_str()),
        }
    }

    fn set_response_visible(&mut self, visible: bool) {
        self.response_visible = visible;
    }

    fn set_loading_visible(&mut self, visible: bool) {
        if visible {
            self.print_side(LOADING_TEXT);
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        tracing::trace!(enabled, "Query control toggled");
    }
}

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// `:upload [PATH]`; a missing path submits an empty selection.
    Upload(Option<PathBuf>),
    /// `:stats`
    Stats,
    /// `:help`
    Help,
    /// `:quit` or `:exit`
    Quit,
    /// Anything else, submitted verbatim as a query.
    Query(String),
}

impl ShellCommand {
    /// Interpret a line typed into the shell.
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (trimmed, ""),
        };
        match word {
            ":upload" | ":u" => {
                Self::Upload((!rest.is_empty()).then(|| PathBuf::from(rest)))
            }
            ":stats" => Self::Stats,
            ":help" | ":h" => Self::Help,
            ":quit" | ":q" | ":exit" => Self::Quit,
            _ => Self::Query(line.to_string()),
        }
    }
}

/// Read commands from `input` until end of input or `:quit`.
///
/// Both forms stay available for the whole session, like the page they stand in for.
pub async fn run_shell<B, R, O, E>(
    uploads: &UploadHandler<B>,
    queries: &QueryHandler<B>,
    metrics: &SessionMetrics,
    input: R,
    view: &mut TerminalView<O, E>,
) -> io::Result<()>
where
    B: Backend,
    R: AsyncBufRead + Unpin,
    O: Write,
    E: Write,
{
    let mut lines = input.lines();
    view.print_line(HELP_TEXT);
    view.prompt();

    while let Some(line) = lines.next_line().await? {
        match ShellCommand::parse(&line) {
            ShellCommand::Upload(path) => {
                let selection = path.map(FileSelection::single).unwrap_or_default();
                uploads.submit(&selection, view).await;
            }
            ShellCommand::Query(text) => {
                queries.submit(&text, view).await;
            }
            ShellCommand::Stats => {
                let snapshot = metrics.snapshot();
                let text = serde_json::to_string_pretty(&snapshot)
                    .unwrap_or_else(|_| format!("{snapshot:?}"));
                view.print_line(&text);
            }
            ShellCommand::Help => view.print_line(HELP_TEXT),
            ShellCommand::Quit => break,
        }
        view.prompt();
    }

    tracing::debug!(stats = ?metrics.snapshot(), "Shell session ended");
    Ok(())
}
