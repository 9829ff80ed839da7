//! Shared types for packet-sim

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Error returned when a protocol or request kind label is not recognised
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {what} '{value}'")]
pub struct ParseLabelError {
    what: &'static str,
    value: String,
}

/// Simulated transport protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl Protocol {
    pub const ALL: [Protocol; 2] = [Protocol::Tcp, Protocol::Udp];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }

    /// Label shown next to the protocol selector
    pub fn description(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP (Reliable)",
            Protocol::Udp => "UDP (Connectionless)",
        }
    }

    /// Pause after each simulated packet. Purely cosmetic: UDP "is faster".
    #[inline]
    pub fn packet_delay(&self) -> Duration {
        match self {
            Protocol::Tcp => Duration::from_millis(500),
            Protocol::Udp => Duration::from_millis(300),
        }
    }

    pub fn next(self) -> Self {
        match self {
            Protocol::Tcp => Protocol::Udp,
            Protocol::Udp => Protocol::Tcp,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            _ => Err(ParseLabelError { what: "protocol", value: s.to_string() }),
        }
    }
}

/// Kind of request to simulate
///
/// Any kind may be paired with either protocol; pairs without a dedicated
/// template fall back to the protocol's generic packet message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    #[default]
    Syn,
    Ack,
    Fin,
    Data,
    Broadcast,
    Multicast,
}

impl RequestKind {
    pub const ALL: [RequestKind; 6] = [
        RequestKind::Syn,
        RequestKind::Ack,
        RequestKind::Fin,
        RequestKind::Data,
        RequestKind::Broadcast,
        RequestKind::Multicast,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Syn => "SYN Request",
            RequestKind::Ack => "ACK Request",
            RequestKind::Fin => "FIN Request",
            RequestKind::Data => "Data Packet",
            RequestKind::Broadcast => "Broadcast",
            RequestKind::Multicast => "Multicast",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RequestKind {
    type Err = ParseLabelError;

    /// Accepts short names (`syn`) as well as display labels (`SYN Request`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let short = wanted.strip_suffix(" request").unwrap_or(&wanted);
        match short {
            "syn" => Ok(RequestKind::Syn),
            "ack" => Ok(RequestKind::Ack),
            "fin" => Ok(RequestKind::Fin),
            "data" | "data packet" => Ok(RequestKind::Data),
            "broadcast" => Ok(RequestKind::Broadcast),
            "multicast" => Ok(RequestKind::Multicast),
            _ => Err(ParseLabelError { what: "request kind", value: s.to_string() }),
        }
    }
}

/// Status recorded on a history row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HistoryStatus {
    Simulated,
}

impl HistoryStatus {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryStatus::Simulated => "Simulated",
        }
    }
}

/// One row of the request history table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub protocol: Protocol,
    pub address: String,
    pub port: u16,
    pub kind: RequestKind,
    /// Packet count of the whole request, not the iteration index
    pub packets: u32,
    pub status: HistoryStatus,
}

impl HistoryEntry {
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Presentation hint attached to a log line (icon and colour only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogTone {
    Info,
    Start,
    Success,
    Warning,
    Error,
    Stopped,
    Packet { protocol: Protocol, kind: RequestKind },
}

/// A timestamped line in the simulation log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogLine {
    pub timestamp: DateTime<Local>,
    pub text: String,
    pub tone: LogTone,
}

impl LogLine {
    pub fn new(text: impl Into<String>, tone: LogTone) -> Self {
        Self { timestamp: Local::now(), text: text.into(), tone }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, LogTone::Info)
    }

    /// `[HH:MM:SS] text`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%H:%M:%S"), self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_delays() {
        assert_eq!(Protocol::Tcp.packet_delay(), Duration::from_millis(500));
        assert_eq!(Protocol::Udp.packet_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_protocol_from_str() {
        assert_eq!("tcp".parse::<Protocol>().unwrap(), Protocol::Tcp);
        assert_eq!(" UDP ".parse::<Protocol>().unwrap(), Protocol::Udp);
        assert!("icmp".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_request_kind_from_label_and_short_name() {
        assert_eq!("SYN Request".parse::<RequestKind>().unwrap(), RequestKind::Syn);
        assert_eq!("fin".parse::<RequestKind>().unwrap(), RequestKind::Fin);
        assert_eq!("Data Packet".parse::<RequestKind>().unwrap(), RequestKind::Data);
        assert_eq!("multicast".parse::<RequestKind>().unwrap(), RequestKind::Multicast);
        let err = "RST".parse::<RequestKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown request kind 'RST'");
    }

    #[test]
    fn test_request_kind_cycles() {
        assert_eq!(RequestKind::Multicast.next(), RequestKind::Syn);
        assert_eq!(RequestKind::Syn.prev(), RequestKind::Multicast);
        for kind in RequestKind::ALL {
            assert_eq!(kind.next().prev(), kind);
        }
    }

    #[test]
    fn test_log_line_render() {
        let line = LogLine::info("Log cleared");
        let rendered = line.render();
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] Log cleared"));
        // "[HH:MM:SS] " prefix
        assert_eq!(rendered.len(), "[00:00:00] Log cleared".len());
    }
}
