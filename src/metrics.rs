use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing submissions made during this session.
#[derive(Default)]
pub struct SessionMetrics {
    uploads_succeeded: AtomicU64,
    uploads_failed: AtomicU64,
    uploads_rejected: AtomicU64,
    queries_answered: AtomicU64,
    queries_failed: AtomicU64,
    queries_rejected: AtomicU64,
}

impl SessionMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an upload the server accepted.
    pub fn record_upload_succeeded(&self) {
        self.uploads_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an upload that was refused by the server or never completed.
    pub fn record_upload_failed(&self) {
        self.uploads_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an upload stopped before any request because nothing was selected.
    pub fn record_upload_rejected(&self) {
        self.uploads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query that produced a rendered answer.
    pub fn record_query_answered(&self) {
        self.queries_answered.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query that was refused by the server or never completed.
    pub fn record_query_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a query stopped before any request because the input was blank.
    pub fn record_query_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads_succeeded: self.uploads_succeeded.load(Ordering::Relaxed),
            uploads_failed: self.uploads_failed.load(Ordering::Relaxed),
            uploads_rejected: self.uploads_rejected.load(Ordering::Relaxed),
            queries_answered: self.queries_answered.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of session counters used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Uploads answered with a 2xx status.
    pub uploads_succeeded: u64,
    /// Uploads answered with an error status or aborted by an exception.
    pub uploads_failed: u64,
    /// Uploads rejected locally because no file was selected.
    pub uploads_rejected: u64,
    /// Queries answered with a 2xx status.
    pub queries_answered: u64,
    /// Queries answered with an error status or aborted by an exception.
    pub queries_failed: u64,
    /// Queries rejected locally because the input was blank.
    pub queries_rejected: u64,
}
