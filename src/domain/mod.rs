//! Domain models - simulation requests, log and history types
//!
//! This module contains the data types shared by the worker and the UI:
//! - `SimulationRequest` - a validated request, built from `RequestInput`
//! - `Protocol` / `RequestKind` - the two selectors of the request form
//! - `HistoryEntry` - one row of the request history
//! - `LogLine` - a timestamped activity log line
//! - `message` - the text templates shown in the activity log

pub mod message;
pub mod request;
pub mod types;

// Re-export commonly used types at module level
pub use request::{RequestInput, SimulationRequest, ValidationError};
pub use types::{HistoryEntry, HistoryStatus, LogLine, LogTone, Protocol, RequestKind};
