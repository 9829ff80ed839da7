//! Infrastructure - configuration and shared run control
//!
//! - `config` - Application configuration (TOML loading, defaults)
//! - `control` - Lock-free running flag, run generation and packet counter

pub mod config;
pub mod control;

// Re-export commonly used types
pub use config::Config;
pub use control::{ControlState, RunToken};
