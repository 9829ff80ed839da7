//! Typed channel carrying simulation events to the UI context
//!
//! The worker only ever sends; the UI drains the receiver on its own loop and
//! applies events to its state. The channel is bounded and sends wait for
//! capacity, so events are never dropped and keep their emission order.

use crate::domain::types::{HistoryEntry, LogLine, LogTone};
use crate::io::sink::{EventSink, SinkError};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;

/// Events emitted by a simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum SimEvent {
    /// New log line
    Log(LogLine),
    /// Process-wide sent-packet total
    Status { packets_sent: u64 },
    /// New history row
    History(HistoryEntry),
}

/// `EventSink` backed by an mpsc sender
///
/// Clone this to share between the controller and each worker.
#[derive(Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<SimEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SimEvent>) -> Self {
        Self { tx }
    }

    async fn send(&self, event: SimEvent) -> Result<(), SinkError> {
        self.tx.send(event).await.map_err(|_| SinkError::Closed)
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn append_log(&self, text: String, tone: LogTone) -> Result<(), SinkError> {
        // Stamp on the worker so the time reflects emission, not UI drain
        self.send(SimEvent::Log(LogLine::new(text, tone))).await
    }

    async fn update_status(&self, packets_sent: u64) -> Result<(), SinkError> {
        self.send(SimEvent::Status { packets_sent }).await
    }

    async fn append_history(&self, entry: HistoryEntry) -> Result<(), SinkError> {
        self.send(SimEvent::History(entry)).await
    }
}

/// Create a new event channel pair
///
/// Returns (sink, receiver); the sink can be cloned and shared.
pub fn create_event_channel(buffer_size: usize) -> (ChannelSink, mpsc::Receiver<SimEvent>) {
    let (tx, rx) = mpsc::channel(buffer_size.max(1));
    (ChannelSink::new(tx), rx)
}
