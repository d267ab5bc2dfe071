//! Fire-and-forget request history.
//!
//! # Responsibilities
//! - Carry per-request accounting records to the history sink
//! - Never block or fail the response path on sink trouble
//!
//! # Design Decisions
//! - Records flow over an unbounded channel to one drain task
//! - Sink errors are logged and dropped at the task boundary
//! - The persistent store is an external collaborator; the default sink
//!   writes structured log events

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

/// One request's accounting record.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    /// Credential the request was billed against, when one was presented.
    pub credential: Option<String>,
    pub filename: String,
    pub original_size: usize,
    /// Zero for failed requests.
    pub optimized_size: usize,
    pub success: bool,
    /// Whether the result came from the cache.
    pub cached: bool,
    /// Error message for failed requests.
    pub error: Option<String>,
}

/// Failure reported by a history sink.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HistoryError(pub String);

/// Destination for request records.
pub trait HistorySink: Send + Sync + 'static {
    fn record(&self, record: &RequestRecord) -> Result<(), HistoryError>;
}

/// Default sink: structured log events.
pub struct TracingSink;

impl HistorySink for TracingSink {
    fn record(&self, record: &RequestRecord) -> Result<(), HistoryError> {
        tracing::info!(
            credential = record.credential.as_deref().unwrap_or("-"),
            filename = %record.filename,
            original_size = record.original_size,
            optimized_size = record.optimized_size,
            success = record.success,
            cached = record.cached,
            error = record.error.as_deref().unwrap_or(""),
            "Request recorded"
        );
        Ok(())
    }
}

/// Handle for submitting records. Cloneable; submission never blocks.
#[derive(Clone)]
pub struct HistoryLog {
    tx: mpsc::UnboundedSender<RequestRecord>,
}

impl HistoryLog {
    /// Spawn the drain task feeding the given sink. Must be called from
    /// within a Tokio runtime.
    pub fn spawn(sink: Arc<dyn HistorySink>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<RequestRecord>();

        tokio::spawn(async move {
            while let Some(record) = rx.recv().await {
                if let Err(e) = sink.record(&record) {
                    tracing::warn!(error = %e, "History sink failed; record dropped");
                }
            }
        });

        Self { tx }
    }

    /// Submit a record. A closed drain task drops the record silently; the
    /// response path is never affected.
    pub fn submit(&self, record: RequestRecord) {
        let _ = self.tx.send(record);
    }
}
