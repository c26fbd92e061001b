use super::{Outcome, Submission, failure_message};
use crate::{
    metrics::SessionMetrics,
    render::Renderer,
    transport::{Backend, QueryRequest},
    ui::{Content, ContainerClass, QueryView},
};
use serde_json::Value;
use std::sync::Arc;

/// Container text when the query input is blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query";
/// Container text for an error reply carrying neither `detail` nor `error`.
pub const QUERY_FAILED_MESSAGE: &str = "Query failed";
/// Container text when the reply never arrived intact.
pub const QUERY_ERROR_MESSAGE: &str = "Error processing query";

/// Handles submissions of the query form.
pub struct QueryHandler<B> {
    backend: Arc<B>,
    renderer: Renderer,
    prefix: Option<String>,
    metrics: Arc<SessionMetrics>,
}

impl<B> QueryHandler<B>
where
    B: Backend,
{
    /// Build a handler sending through `backend`, rendering answers with `renderer`.
    pub fn new(backend: Arc<B>, renderer: Renderer, metrics: Arc<SessionMetrics>) -> Self {
        Self {
            backend,
            renderer,
            prefix: None,
            metrics,
        }
    }

    /// Prepend `prefix` to every submitted query.
    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Submit `input` and show the answer or failure in `view`.
    ///
    /// Blank input is reported inline without contacting the server. While the request is in
    /// flight the submit control is disabled, the loading indicator shown, and the previous
    /// answer hidden; the control is re-enabled on every path.
    pub async fn submit<V>(&self, input: &str, view: &mut V) -> Outcome
    where
        V: QueryView + ?Sized,
    {
        if input.trim().is_empty() {
            view.set_content(
                Content::Text(EMPTY_QUERY_MESSAGE.to_string()),
                ContainerClass::INLINE_ERROR,
            );
            self.metrics.record_query_rejected();
            return Outcome::Rejected;
        }

        let submission = Submission::begin("query");
        view.set_submit_enabled(false);
        view.set_loading_visible(true);
        view.set_response_visible(false);

        let request = QueryRequest {
            query: match &self.prefix {
                Some(prefix) => format!("{prefix}{input}"),
                None => input.to_string(),
            },
        };

        let result = self.backend.query(&request).await;
        view.set_loading_visible(false);
        view.set_response_visible(true);

        let outcome = match result {
            Ok(reply) if reply.is_success() => {
                let answer = answer_text(&reply.body);
                tracing::info!(
                    submission = %submission.id,
                    status = reply.status.as_u16(),
                    answer_chars = answer.chars().count(),
                    "Query answered"
                );
                view.set_content(
                    Content::Rendered(self.renderer.render(&answer)),
                    ContainerClass::SUCCESS,
                );
                Outcome::Succeeded
            }
            Ok(reply) => {
                let message = failure_message(&reply.body, QUERY_FAILED_MESSAGE);
                tracing::warn!(
                    submission = %submission.id,
                    status = reply.status.as_u16(),
                    message = %message,
                    "Query refused"
                );
                view.set_content(Content::Text(message), ContainerClass::ERROR);
                Outcome::Failed
            }
            Err(error) => {
                tracing::error!(submission = %submission.id, error = %error, "Query errored");
                view.set_content(
                    Content::Text(QUERY_ERROR_MESSAGE.to_string()),
                    ContainerClass::ERROR,
                );
                Outcome::Failed
            }
        };

        view.set_submit_enabled(true);
        match outcome {
            Outcome::Succeeded => self.metrics.record_query_answered(),
            _ => self.metrics.record_query_failed(),
        }
        submission.finish(outcome);
        outcome
    }
}

/// Answer text carried by a successful reply.
///
/// A missing or `null` `response` yields an empty answer; non-string values are shown as
/// compact JSON.
pub fn answer_text(body: &Value) -> String {
    match body.get("response") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
