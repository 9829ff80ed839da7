//! Start/stop protocol on top of `ControlState`
//!
//! `start` and `stop` are synchronous and are called from the UI context.
//! They return the log lines the UI should append itself instead of pushing
//! them through the event channel, which the UI is the only drainer of.
//!
//! Each accepted start spawns two tasks: the runner, and a supervisor that
//! awaits it. The supervisor turns a runner panic into one error line and
//! always hands the run back to IDLE, whatever way the runner ended.

use crate::domain::message;
use crate::domain::request::{RequestInput, SimulationRequest, ValidationError};
use crate::domain::types::{LogLine, LogTone};
use crate::infra::control::ControlState;
use crate::io::sink::EventSink;
use crate::services::runner::{RunOutcome, SimulationRunner};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

/// Result of an accepted or ignored start action
#[derive(Debug)]
pub enum StartOutcome {
    /// A worker was spawned
    Started {
        /// Banner lines to append to the log, in order
        banner: Vec<LogLine>,
        /// Supervisor handle; resolves once the run is over and state is IDLE
        handle: JoinHandle<RunOutcome>,
    },
    /// A run is already active; nothing happened
    AlreadyRunning,
}

pub struct SimulationController {
    control: Arc<ControlState>,
    sink: Arc<dyn EventSink>,
}

impl SimulationController {
    pub fn new(control: Arc<ControlState>, sink: Arc<dyn EventSink>) -> Self {
        Self { control, sink }
    }

    pub fn control(&self) -> &Arc<ControlState> {
        &self.control
    }

    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Start button enablement
    pub fn can_start(&self) -> bool {
        !self.control.is_running()
    }

    /// Stop button enablement
    pub fn can_stop(&self) -> bool {
        self.control.is_running()
    }

    /// Validate form input and start a run
    ///
    /// Must be called within a tokio runtime.
    pub fn start(&self, input: &RequestInput) -> Result<StartOutcome, ValidationError> {
        if self.control.is_running() {
            debug!("start_ignored_already_running");
            return Ok(StartOutcome::AlreadyRunning);
        }

        let request = input.parse().inspect_err(|e| {
            warn!(reason = %e, address = %input.address, port = %input.port, "start_rejected");
        })?;

        Ok(self.start_request(request))
    }

    /// Start a run for an already validated request
    pub fn start_request(&self, request: SimulationRequest) -> StartOutcome {
        let Some(token) = self.control.try_start() else {
            debug!("start_ignored_already_running");
            return StartOutcome::AlreadyRunning;
        };

        let banner = message::start_banner(&request);
        let protocol = request.protocol();
        let runner =
            SimulationRunner::new(request, token, self.control.clone(), self.sink.clone());
        let control = self.control.clone();
        let sink = self.sink.clone();

        let handle = tokio::spawn(async move {
            let outcome = match tokio::spawn(runner.run()).await {
                Ok(outcome) => outcome,
                Err(join_err) => {
                    let reason = panic_reason(join_err);
                    error!(run = %token.generation(), error = %reason, "simulation_worker_panicked");
                    if let Err(e) = sink
                        .append_log(message::error_message(protocol, &reason), LogTone::Error)
                        .await
                    {
                        debug!(error = %e, "simulation_error_not_reported");
                    }
                    RunOutcome::Failed { reason }
                }
            };

            if control.finish(token) {
                debug!(run = %token.generation(), "control_released");
            }
            outcome
        });

        StartOutcome::Started { banner, handle }
    }

    /// Stop the active run. Returns the line to log, or `None` if idle.
    pub fn stop(&self) -> Option<LogLine> {
        if !self.control.stop() {
            return None;
        }
        info!(packets_sent = %self.control.packets_sent(), "simulation_stop_requested");
        Some(LogLine::new(message::STOPPED_BY_USER, LogTone::Stopped))
    }
}

fn panic_reason(err: JoinError) -> String {
    if !err.is_panic() {
        return "worker cancelled".to_string();
    }
    let payload = err.into_panic();
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
