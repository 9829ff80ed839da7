//! Front ends
//!
//! - `app` - Interactive ratatui dashboard
//! - `headless` - Single run printed to stdout
//! - `state` / `draw` - Dashboard state and rendering

pub mod app;
pub mod draw;
pub mod headless;
pub mod state;

pub use app::run_dashboard;
pub use headless::{run_headless, HeadlessResult, OutputFormat};
