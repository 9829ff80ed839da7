//! IO modules - where simulation output goes
//!
//! - `sink` - The `EventSink` contract the worker writes to
//! - `event_channel` - Bounded channel delivering worker events to the UI context

pub mod event_channel;
pub mod sink;

// Re-export commonly used types
pub use event_channel::{create_event_channel, ChannelSink, SimEvent};
pub use sink::{EventSink, SinkError};
