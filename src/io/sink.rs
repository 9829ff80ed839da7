//! Sink the simulation worker reports through
//!
//! Implementations must be callable from the worker task and must not touch
//! presentation state directly; they hand events to whoever owns the UI.

use crate::domain::types::{HistoryEntry, LogTone};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The consumer went away (UI closed)
    #[error("event channel closed")]
    Closed,
    /// Consumer-specific failure
    #[error("{0}")]
    Rejected(String),
}

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Append a line to the simulation log
    async fn append_log(&self, text: String, tone: LogTone) -> Result<(), SinkError>;

    /// Report the process-wide sent-packet total
    async fn update_status(&self, packets_sent: u64) -> Result<(), SinkError>;

    /// Append a row to the request history
    async fn append_history(&self, entry: HistoryEntry) -> Result<(), SinkError>;
}
