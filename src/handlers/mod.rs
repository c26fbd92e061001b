//! Submission handlers for the upload and query forms.
//!
//! Each submission walks `idle → submitting → (succeeded | failed) → idle`. Validation
//! failures never leave `idle` and issue no request.

pub mod message;
mod query;
mod upload;

pub use message::failure_message;
pub use query::{
    EMPTY_QUERY_MESSAGE, QUERY_ERROR_MESSAGE, QUERY_FAILED_MESSAGE, QueryHandler, answer_text,
};
pub use upload::{
    NO_FILE_MESSAGE, UPLOAD_ERROR_MESSAGE, UPLOAD_FAILED_MESSAGE, UPLOAD_SUCCESS_MESSAGE,
    UPLOADING_MESSAGE, UploadHandler,
};

use std::fmt;
use uuid::Uuid;

/// Lifecycle position of a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No request in flight.
    Idle,
    /// Request sent, reply pending.
    Submitting,
    /// Server answered with a 2xx status.
    Succeeded,
    /// Server answered with an error status, or the request never completed.
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Result of one submit action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Input failed validation; no request was made.
    Rejected,
    /// Server answered with a 2xx status.
    Succeeded,
    /// Server answered with an error status, or the request never completed.
    Failed,
}

impl Outcome {
    /// Whether the submission reached the server and succeeded.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Succeeded)
    }

    const fn terminal_phase(self) -> Phase {
        match self {
            Self::Rejected => Phase::Idle,
            Self::Succeeded => Phase::Succeeded,
            Self::Failed => Phase::Failed,
        }
    }
}

/// Traces the phase transitions of one in-flight submission.
struct Submission {
    id: Uuid,
    form: &'static str,
}

impl Submission {
    fn begin(form: &'static str) -> Self {
        let submission = Self {
            id: Uuid::new_v4(),
            form,
        };
        submission.transition(Phase::Idle, Phase::Submitting);
        submission
    }

    fn finish(self, outcome: Outcome) {
        let terminal = outcome.terminal_phase();
        self.transition(Phase::Submitting, terminal);
        self.transition(terminal, Phase::Idle);
    }

    fn transition(&self, from: Phase, to: Phase) {
        tracing::debug!(
            submission = %self.id,
            form = self.form,
            %from,
            %to,
            "Submission phase changed"
        );
    }
}
