//! Services - simulation lifecycle
//!
//! - `runner` - Background worker emitting one simulated packet per delay
//! - `controller` - Start/stop entry points used by both front ends

pub mod controller;
pub mod runner;

// Re-export commonly used types
pub use controller::{SimulationController, StartOutcome};
pub use runner::{RunOutcome, SimulationRunner};
