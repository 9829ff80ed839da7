//! Configuration loading from TOML files
//!
//! Config file is selected via:
//! 1. --config <path> command line argument
//! 2. PACKET_SIM_CONFIG environment variable
//! 3. Default: config/packet-sim.toml
//!
//! Every key is optional; a missing or unreadable file falls back to defaults.

use crate::domain::request::RequestInput;
use crate::domain::types::{Protocol, RequestKind};
use anyhow::Context;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

pub const CONFIG_ENV_VAR: &str = "PACKET_SIM_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/packet-sim.toml";

/// Initial values of the request form
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub address: String,
    pub port: u16,
    pub protocol: Protocol,
    pub request_kind: RequestKind,
    pub packets: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            protocol: Protocol::Tcp,
            request_kind: RequestKind::Syn,
            packets: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Redraw / input poll interval
    pub tick_rate_ms: u64,
    /// Oldest log lines are evicted beyond this (0 = unbounded)
    pub max_log_lines: usize,
    /// Capacity of the worker -> UI event channel
    pub event_buffer: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 100, max_log_lines: 1000, event_buffer: 256 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Diagnostic log file used while the dashboard owns the terminal
    pub file: String,
    /// Default filter when RUST_LOG is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { file: "packet-sim.log".to_string(), level: "info".to_string() }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TomlConfig {
    pub defaults: DefaultsConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    default_address: String,
    default_port: u16,
    default_protocol: Protocol,
    default_request_kind: RequestKind,
    default_packets: u32,
    tick_rate_ms: u64,
    max_log_lines: usize,
    event_buffer: usize,
    log_file: String,
    log_level: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        Self {
            default_address: toml_config.defaults.address,
            default_port: toml_config.defaults.port,
            default_protocol: toml_config.defaults.protocol,
            default_request_kind: toml_config.defaults.request_kind,
            default_packets: toml_config.defaults.packets,
            tick_rate_ms: toml_config.ui.tick_rate_ms.max(10),
            max_log_lines: toml_config.ui.max_log_lines,
            event_buffer: toml_config.ui.event_buffer.max(1),
            log_file: toml_config.logging.file,
            log_level: toml_config.logging.level,
            config_file,
        }
    }

    /// Determine config file path from the command line or environment
    pub fn resolve_config_path(cli_path: Option<&str>) -> String {
        if let Some(path) = cli_path {
            return path.to_string();
        }

        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return path;
            }
        }

        DEFAULT_CONFIG_PATH.to_string()
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(Self::from_toml(toml_config, path.display().to_string()))
    }

    /// Form contents before the user edits anything
    pub fn initial_input(&self) -> RequestInput {
        RequestInput {
            address: self.default_address.clone(),
            port: self.default_port.to_string(),
            protocol: self.default_protocol,
            kind: self.default_request_kind,
            packets: self.default_packets.to_string(),
        }
    }

    pub fn default_address(&self) -> &str {
        &self.default_address
    }

    pub fn default_port(&self) -> u16 {
        self.default_port
    }

    pub fn default_protocol(&self) -> Protocol {
        self.default_protocol
    }

    pub fn default_request_kind(&self) -> RequestKind {
        self.default_request_kind
    }

    pub fn default_packets(&self) -> u32 {
        self.default_packets
    }

    pub fn tick_rate_ms(&self) -> u64 {
        self.tick_rate_ms
    }

    pub fn max_log_lines(&self) -> usize {
        self.max_log_lines
    }

    pub fn event_buffer(&self) -> usize {
        self.event_buffer
    }

    pub fn log_file(&self) -> &str {
        &self.log_file
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to shrink the log buffer
    #[cfg(test)]
    pub fn with_max_log_lines(mut self, lines: usize) -> Self {
        self.max_log_lines = lines;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_address(), "127.0.0.1");
        assert_eq!(config.default_port(), 8080);
        assert_eq!(config.default_protocol(), Protocol::Tcp);
        assert_eq!(config.default_request_kind(), RequestKind::Syn);
        assert_eq!(config.default_packets(), 5);
        assert_eq!(config.tick_rate_ms(), 100);
        assert_eq!(config.config_file(), "default");
    }

    #[test]
    fn test_initial_input_is_valid() {
        let request = Config::default().initial_input().parse().unwrap();
        assert_eq!(request.target(), "127.0.0.1:8080");
        assert_eq!(request.packets(), 5);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let toml_config: TomlConfig = toml::from_str(
            r#"
[defaults]
protocol = "udp"
request_kind = "multicast"
"#,
        )
        .unwrap();
        let config = Config::from_toml(toml_config, "inline".to_string());
        assert_eq!(config.default_protocol(), Protocol::Udp);
        assert_eq!(config.default_request_kind(), RequestKind::Multicast);
        assert_eq!(config.default_port(), 8080);
        assert_eq!(config.log_file(), "packet-sim.log");
    }

    #[test]
    fn test_tick_rate_and_buffer_are_clamped() {
        let toml_config: TomlConfig =
            toml::from_str("[ui]\ntick_rate_ms = 0\nevent_buffer = 0\n").unwrap();
        let config = Config::from_toml(toml_config, "inline".to_string());
        assert_eq!(config.tick_rate_ms(), 10);
        assert_eq!(config.event_buffer(), 1);
    }

    #[test]
    fn test_resolve_config_path_from_cli() {
        assert_eq!(Config::resolve_config_path(Some("my.toml")), "my.toml");
    }
}
