//! packet-sim - educational network packet simulator
//!
//! Nothing here touches the network: every "packet" is a log line produced by
//! a delay loop on a background task.
//!
//! Module structure:
//! - `domain/` - Requests, validation, history/log types, message templates
//! - `infra/` - Config and the shared run/stop control state
//! - `io/` - Event sink contract and the worker -> UI channel
//! - `services/` - Simulation runner and start/stop controller
//! - `ui/` - Terminal dashboard and headless runner

use anyhow::Context;
use clap::{Parser, Subcommand};
use packet_sim::domain::{Protocol, RequestKind};
use packet_sim::infra::Config;
use packet_sim::services::RunOutcome;
use packet_sim::ui::{run_dashboard, run_headless, HeadlessResult, OutputFormat};
use std::fs::OpenOptions;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Network protocol learning tool - simulated TCP/UDP packet activity
#[derive(Parser, Debug)]
#[command(name = "packet-sim", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive terminal dashboard (default)
    Tui,
    /// Run one simulation and print the log to stdout
    Run(RunArgs),
}

/// Unset options take the form defaults from the config file
#[derive(clap::Args, Debug)]
struct RunArgs {
    /// Target IPv4 address (cosmetic, nothing is sent)
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    port: Option<String>,
    /// tcp or udp
    #[arg(long)]
    protocol: Option<Protocol>,
    /// syn, ack, fin, data, broadcast or multicast
    #[arg(long)]
    kind: Option<RequestKind>,
    /// Number of packets to simulate (1-1000)
    #[arg(long)]
    packets: Option<String>,
    /// Emit every event as a JSON line
    #[arg(long)]
    json: bool,
}

/// Initialize structured logging with configurable level via RUST_LOG env var
///
/// The dashboard owns the terminal, so it logs to the configured file.
fn init_tracing(config: &Config, to_file: bool) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false);

    if to_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_file())
            .with_context(|| format!("Failed to open log file {}", config.log_file()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let config_path = Config::resolve_config_path(args.config.as_deref());
    let (config, config_error) = match Config::from_file(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let command = args.command.unwrap_or(Command::Tui);
    init_tracing(&config, matches!(command, Command::Tui))?;

    if let Some(e) = config_error {
        warn!(error = %format!("{:#}", e), "config_fallback_to_defaults");
    }
    info!(
        config_file = %config.config_file(),
        default_target = %format!("{}:{}", config.default_address(), config.default_port()),
        default_protocol = %config.default_protocol(),
        tick_rate_ms = %config.tick_rate_ms(),
        "config_loaded"
    );

    match command {
        Command::Tui => {
            run_dashboard(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Run(run) => {
            let mut input = config.initial_input();
            if let Some(address) = run.address {
                input.address = address;
            }
            if let Some(port) = run.port {
                input.port = port;
            }
            if let Some(protocol) = run.protocol {
                input.protocol = protocol;
            }
            if let Some(kind) = run.kind {
                input.kind = kind;
            }
            if let Some(packets) = run.packets {
                input.packets = packets;
            }
            let format = if run.json { OutputFormat::Json } else { OutputFormat::Text };

            let result = run_headless(&config, &input, format, std::io::stdout().lock(), || async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await?;

            Ok(match result {
                HeadlessResult::Rejected(warning) => {
                    eprintln!("Warning: {}", warning);
                    ExitCode::from(2)
                }
                HeadlessResult::Finished(RunOutcome::Completed { .. }) => ExitCode::SUCCESS,
                HeadlessResult::Finished(RunOutcome::Cancelled { .. }) => ExitCode::from(130),
                HeadlessResult::Finished(RunOutcome::Failed { .. }) => ExitCode::FAILURE,
            })
        }
    }
}
