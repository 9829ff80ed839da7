//! Headless runner - one simulation, log printed as it happens
//!
//! Same controller and channel as the dashboard; the "UI context" is this
//! function's loop, which prints events instead of drawing them.

use crate::domain::request::RequestInput;
use crate::domain::types::LogLine;
use crate::infra::config::Config;
use crate::infra::control::ControlState;
use crate::io::event_channel::{create_event_channel, SimEvent};
use crate::services::controller::{SimulationController, StartOutcome};
use crate::services::runner::RunOutcome;
use anyhow::Context;
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `[HH:MM:SS] text` per log line
    Text,
    /// Every event as one JSON object per line
    Json,
}

/// Final result of a headless run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadlessResult {
    /// Input failed validation; carries the warning shown to the user
    Rejected(String),
    Finished(RunOutcome),
}

struct Printer<W: Write> {
    out: W,
    format: OutputFormat,
    packets_sent: u64,
    history_rows: usize,
}

impl<W: Write> Printer<W> {
    fn event(&mut self, event: &SimEvent) -> anyhow::Result<()> {
        match event {
            SimEvent::Status { packets_sent } => self.packets_sent = *packets_sent,
            SimEvent::History(_) => self.history_rows += 1,
            SimEvent::Log(_) => {}
        }
        match (self.format, event) {
            (OutputFormat::Json, _) => {
                let json = serde_json::to_string(event).context("Failed to encode event")?;
                writeln!(self.out, "{}", json)?;
            }
            (OutputFormat::Text, SimEvent::Log(line)) => writeln!(self.out, "{}", line.render())?,
            (OutputFormat::Text, _) => {}
        }
        Ok(())
    }

    fn log(&mut self, line: LogLine) -> anyhow::Result<()> {
        self.event(&SimEvent::Log(line))
    }

    fn summary(&mut self) -> anyhow::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(
                self.out,
                "Packets Sent: {} | History rows: {}",
                self.packets_sent, self.history_rows
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Run one simulation for `input`, writing output to `out`
///
/// `interrupt` resolves when the user asks to stop (Ctrl+C in the binary);
/// it is polled again after each stop, so it may resolve more than once.
pub async fn run_headless<W, F, Fut>(
    config: &Config,
    input: &RequestInput,
    format: OutputFormat,
    out: W,
    mut interrupt: F,
) -> anyhow::Result<HeadlessResult>
where
    W: Write,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let control = Arc::new(ControlState::new());
    let (sink, mut events) = create_event_channel(config.event_buffer());
    let controller = SimulationController::new(control, Arc::new(sink));
    let mut printer = Printer { out, format, packets_sent: 0, history_rows: 0 };

    let (banner, mut handle) = match controller.start(input) {
        Ok(StartOutcome::Started { banner, handle }) => (banner, handle),
        Ok(StartOutcome::AlreadyRunning) => anyhow::bail!("a simulation is already running"),
        Err(e) => return Ok(HeadlessResult::Rejected(e.to_string())),
    };
    for line in banner {
        printer.log(line)?;
    }

    let mut interrupted = Box::pin(interrupt());
    let outcome = loop {
        tokio::select! {
            Some(event) = events.recv() => printer.event(&event)?,
            _ = &mut interrupted => {
                while let Ok(event) = events.try_recv() {
                    printer.event(&event)?;
                }
                if let Some(line) = controller.stop() {
                    printer.log(line)?;
                }
                interrupted = Box::pin(interrupt());
            }
            joined = &mut handle => break joined.context("Simulation supervisor failed")?,
        }
    };

    // The supervisor finished, so the worker has sent everything it will send
    while let Ok(event) = events.try_recv() {
        printer.event(&event)?;
    }
    printer.summary()?;

    info!(outcome = ?outcome, "headless_run_finished");
    Ok(HeadlessResult::Finished(outcome))
}
