//! Simulation worker - produces one log line, status update and history row
//! per simulated packet
//!
//! The runner polls `ControlState` at the top of every iteration; a stop is
//! therefore observed within one packet delay. It never returns an error: sink
//! failures are reported as a single log line and end the run.

use crate::domain::message;
use crate::domain::request::SimulationRequest;
use crate::domain::types::{HistoryEntry, HistoryStatus, LogTone};
use crate::infra::control::{ControlState, RunToken};
use crate::io::sink::{EventSink, SinkError};
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// All packets simulated and the completion line emitted
    Completed { packets: u32 },
    /// Stopped between iterations after `packets` were simulated
    Cancelled { packets: u32 },
    /// Aborted by a sink failure or a worker panic
    Failed { reason: String },
}

/// Runs a single simulation request on the worker task
pub struct SimulationRunner {
    request: SimulationRequest,
    token: RunToken,
    control: Arc<ControlState>,
    sink: Arc<dyn EventSink>,
}

impl SimulationRunner {
    pub fn new(
        request: SimulationRequest,
        token: RunToken,
        control: Arc<ControlState>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self { request, token, control, sink }
    }

    pub fn request(&self) -> &SimulationRequest {
        &self.request
    }

    /// Run to completion, cancellation or failure
    pub async fn run(self) -> RunOutcome {
        let protocol = self.request.protocol();
        let started = Instant::now();

        info!(
            run = %self.token.generation(),
            protocol = %protocol,
            target = %self.request.target(),
            kind = %self.request.kind(),
            packets = %self.request.packets(),
            "simulation_started"
        );

        match self.drive().await {
            Ok(outcome) => {
                match &outcome {
                    RunOutcome::Completed { packets } => info!(
                        run = %self.token.generation(),
                        packets = %packets,
                        elapsed_ms = %started.elapsed().as_millis(),
                        "simulation_completed"
                    ),
                    RunOutcome::Cancelled { packets } => info!(
                        run = %self.token.generation(),
                        packets = %packets,
                        "simulation_cancelled"
                    ),
                    RunOutcome::Failed { .. } => {}
                }
                outcome
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(run = %self.token.generation(), error = %reason, "simulation_failed");
                // Best effort: the sink that just failed may fail again
                if let Err(report_err) = self
                    .sink
                    .append_log(message::error_message(protocol, &reason), LogTone::Error)
                    .await
                {
                    debug!(error = %report_err, "simulation_error_not_reported");
                }
                RunOutcome::Failed { reason }
            }
        }
    }

    async fn drive(&self) -> Result<RunOutcome, SinkError> {
        let request = &self.request;
        let protocol = request.protocol();
        let delay = protocol.packet_delay();
        let mut simulated = 0u32;

        for index in 1..=request.packets() {
            if !self.control.is_active(self.token) {
                return Ok(RunOutcome::Cancelled { packets: simulated });
            }

            let text = message::packet_message(
                protocol,
                request.kind(),
                index,
                request.address(),
                request.port(),
            );
            self.sink
                .append_log(text, LogTone::Packet { protocol, kind: request.kind() })
                .await?;

            let total = self.control.record_packet();
            self.sink.update_status(total).await?;

            self.sink
                .append_history(HistoryEntry {
                    timestamp: Local::now(),
                    protocol,
                    address: request.address().to_string(),
                    port: request.port(),
                    kind: request.kind(),
                    packets: request.packets(),
                    status: HistoryStatus::Simulated,
                })
                .await?;
            simulated = index;

            debug!(run = %self.token.generation(), index = %index, total = %total, "packet_simulated");
            tokio::time::sleep(delay).await;
        }

        // Stopped during the final delay: no completion line
        if !self.control.is_active(self.token) {
            return Ok(RunOutcome::Cancelled { packets: simulated });
        }

        self.sink.append_log(message::completion_message(protocol), LogTone::Success).await?;
        Ok(RunOutcome::Completed { packets: simulated })
    }
}
