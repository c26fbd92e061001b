use super::{Outcome, Submission, failure_message};
use crate::{
    metrics::SessionMetrics,
    selection::FileSelection,
    transport::{Backend, FileAttachment, Reply, TransportError},
    ui::{StatusClass, UploadView},
};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;

/// Status text when the form is submitted without a file.
pub const NO_FILE_MESSAGE: &str = "Please select a file first.";
/// Status text while the upload is in flight.
pub const UPLOADING_MESSAGE: &str = "Uploading...";
/// Status text after a 2xx reply.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully!";
/// Status text for an error reply carrying neither `detail` nor `error`.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";
/// Status text when the file could not be read or the reply never arrived intact.
pub const UPLOAD_ERROR_MESSAGE: &str = "Error uploading file";

/// Handles submissions of the upload form.
pub struct UploadHandler<B> {
    backend: Arc<B>,
    metrics: Arc<SessionMetrics>,
}

impl<B> UploadHandler<B>
where
    B: Backend,
{
    /// Build a handler sending through `backend` and counting into `metrics`.
    pub fn new(backend: Arc<B>, metrics: Arc<SessionMetrics>) -> Self {
        Self { backend, metrics }
    }

    /// Upload the first file of `selection`, reflecting progress and outcome in `view`.
    ///
    /// An empty selection is reported in the status element without contacting the server.
    /// Otherwise the submit control is disabled for the duration of the request and always
    /// re-enabled afterwards.
    pub async fn submit<V>(&self, selection: &FileSelection, view: &mut V) -> Outcome
    where
        V: UploadView + ?Sized,
    {
        let Some(path) = selection.first() else {
            view.set_status(StatusClass::Error, NO_FILE_MESSAGE);
            self.metrics.record_upload_rejected();
            return Outcome::Rejected;
        };

        let submission = Submission::begin("upload");
        view.set_status(StatusClass::Loading, UPLOADING_MESSAGE);
        view.set_submit_enabled(false);

        let outcome = match self.send(path).await {
            Ok(reply) if reply.is_success() => {
                tracing::info!(
                    submission = %submission.id,
                    file = %path.display(),
                    status = reply.status.as_u16(),
                    "Upload accepted"
                );
                view.set_status(StatusClass::Success, UPLOAD_SUCCESS_MESSAGE);
                Outcome::Succeeded
            }
            Ok(reply) => {
                let message = failure_message(&reply.body, UPLOAD_FAILED_MESSAGE);
                tracing::warn!(
                    submission = %submission.id,
                    file = %path.display(),
                    status = reply.status.as_u16(),
                    message = %message,
                    "Upload refused"
                );
                view.set_status(StatusClass::Error, &message);
                Outcome::Failed
            }
            Err(error) => {
                tracing::error!(
                    submission = %submission.id,
                    file = %path.display(),
                    error = %error,
                    "Upload errored"
                );
                view.set_status(StatusClass::Error, UPLOAD_ERROR_MESSAGE);
                Outcome::Failed
            }
        };

        view.set_submit_enabled(true);
        match outcome {
            Outcome::Succeeded => self.metrics.record_upload_succeeded(),
            _ => self.metrics.record_upload_failed(),
        }
        submission.finish(outcome);
        outcome
    }

    async fn send(&self, path: &Path) -> Result<Reply, TransportError> {
        let attachment = FileAttachment::read(path).await?;
        tracing::debug!(
            file = %attachment.file_name,
            bytes = attachment.bytes.len(),
            sha256 = %hex::encode(Sha256::digest(&attachment.bytes)),
            "Sending upload"
        );
        self.backend.upload(attachment).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::{Call, StubBackend, StubReply};
    use crate::ui::UploadPanel;
    use serde_json::json;
    use std::path::PathBuf;

    fn handler(reply: StubReply) -> (UploadHandler<StubBackend>, StubBackend, Arc<SessionMetrics>) {
        let backend = StubBackend::new(reply);
        let metrics = Arc::new(SessionMetrics::new());
        let handler = UploadHandler::new(Arc::new(backend.clone()), metrics.clone());
        (handler, backend, metrics)
    }

    fn fixture(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    #[tokio::test]
    async fn empty_selection_reports_error_without_request() {
        let (handler, backend, metrics) = handler(StubReply::Json(200, json!({})));
        let mut panel = UploadPanel::default();

        let outcome = handler.submit(&FileSelection::empty(), &mut panel).await;

        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(panel.status_class, Some(StatusClass::Error));
        assert_eq!(panel.status_text, NO_FILE_MESSAGE);
        assert!(panel.submit_history.is_empty());
        assert!(backend.recorded_calls().await.is_empty());
        assert_eq!(metrics.snapshot().uploads_rejected, 1);
    }

    #[tokio::test]
    async fn successful_upload_sets_success_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = fixture(&dir, "lecture.md", "# Week 1");
        let (handler, backend, metrics) = handler(StubReply::Json(
            200,
            json!({ "message": "File uploaded and processed successfully" }),
        ));
        let mut panel = UploadPanel::default();

        let outcome = handler
            .submit(&FileSelection::single(&path), &mut panel)
            .await;

        assert_eq!(outcome, Outcome::Succeeded);
        assert_eq!(panel.status_class, Some(StatusClass::Success));
        assert_eq!(panel.status_text, UPLOAD_SUCCESS_MESSAGE);
        assert_eq!(
            panel.status_history.first(),
            Some(&(StatusClass::Loading, UPLOADING_MESSAGE.to_string()))
        );
        assert_eq!(panel.submit_history, vec![false, true]);
        assert!(panel.submit_enabled);

        let calls = backend.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Upload { file_name, bytes } => {
                assert_eq!(file_name, "lecture.md");
                assert_eq!(bytes.as_slice(), b"# Week 1");
            }
            other => panic!("unexpected call {other:?}"),
        }
        assert_eq!(metrics.snapshot().uploads_succeeded, 1);
    }

    #[tokio::test]
    async fn only_first_selected_file_is_sent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = fixture(&dir, "first.txt", "one");
        let second = fixture(&dir, "second.txt", "two");
        let (handler, backend, _) = handler(StubReply::Json(200, json!({})));

        handler
            .submit(
                &FileSelection::from(vec![first, second]),
                &mut UploadPanel::default(),
            )
            .await;

        let calls = backend.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], Call::Upload { file_name, .. } if file_name == "first.txt"));
    }

    #[tokio::test]
    async fn failed_upload_prefers_detail_then_error_then_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = fixture(&dir, "photo.png", "png");
        let cases = [
            (json!({ "detail": "Invalid file type", "error": "ignored" }), "Invalid file type"),
            (json!({ "error": "Disk full" }), "Disk full"),
            (json!({}), UPLOAD_FAILED_MESSAGE),
        ];

        for (body, expected) in cases {
            let (handler, _, metrics) = handler(StubReply::Json(400, body));
            let mut panel = UploadPanel::default();

            let outcome = handler
                .submit(&FileSelection::single(&path), &mut panel)
                .await;

            assert_eq!(outcome, Outcome::Failed);
            assert_eq!(panel.status_class, Some(StatusClass::Error));
            assert_eq!(panel.status_text, expected);
            assert_eq!(panel.submit_history, vec![false, true]);
            assert_eq!(metrics.snapshot().uploads_failed, 1);
        }
    }

    #[tokio::test]
    async fn undecodable_reply_shows_generic_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = fixture(&dir, "notes.txt", "text");
        let (handler, _, _) = handler(StubReply::NotJson(200));
        let mut panel = UploadPanel::default();

        let outcome = handler
            .submit(&FileSelection::single(&path), &mut panel)
            .await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(panel.status_text, UPLOAD_ERROR_MESSAGE);
        assert!(panel.submit_enabled);
    }

    #[tokio::test]
    async fn unreadable_file_shows_generic_error_without_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (handler, backend, _) = handler(StubReply::Json(200, json!({})));
        let mut panel = UploadPanel::default();

        let outcome = handler
            .submit(
                &FileSelection::single(dir.path().join("missing.md")),
                &mut panel,
            )
            .await;

        assert_eq!(outcome, Outcome::Failed);
        assert_eq!(panel.status_class, Some(StatusClass::Error));
        assert_eq!(panel.status_text, UPLOAD_ERROR_MESSAGE);
        assert_eq!(panel.submit_history, vec![false, true]);
        assert!(backend.recorded_calls().await.is_empty());
    }
}
