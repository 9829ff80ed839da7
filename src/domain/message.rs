//! Log message templates

use crate::domain::request::SimulationRequest;
use crate::domain::types::{LogLine, LogTone, Protocol, RequestKind};

pub const STOPPED_BY_USER: &str = "Simulation stopped by user";
pub const LOG_CLEARED: &str = "Log cleared";

/// Lines shown when the dashboard starts
pub const STARTUP_LINES: [&str; 3] = [
    "Network Learning Tool initialized",
    "Ready to simulate network requests",
    "WARNING: Only use on your own systems!",
];

/// Text for simulated packet `index` (1-based)
pub fn packet_message(
    protocol: Protocol,
    kind: RequestKind,
    index: u32,
    address: &str,
    port: u16,
) -> String {
    match (protocol, kind) {
        (Protocol::Tcp, RequestKind::Syn) => {
            format!("TCP SYN packet {} simulated to {}:{}", index, address, port)
        }
        (Protocol::Tcp, RequestKind::Ack) => {
            format!("TCP ACK packet {} simulated to {}:{}", index, address, port)
        }
        (Protocol::Tcp, RequestKind::Fin) => {
            format!("TCP FIN packet {} simulated to {}:{}", index, address, port)
        }
        (Protocol::Tcp, _) => format!("TCP Data packet {} simulated to {}:{}", index, address, port),
        (Protocol::Udp, RequestKind::Broadcast) => format!("UDP Broadcast packet {} simulated", index),
        (Protocol::Udp, RequestKind::Multicast) => format!("UDP Multicast packet {} simulated", index),
        (Protocol::Udp, _) => format!("UDP packet {} simulated to {}:{}", index, address, port),
    }
}

pub fn completion_message(protocol: Protocol) -> String {
    format!("{} simulation completed successfully", protocol)
}

pub fn error_message(protocol: Protocol, reason: &str) -> String {
    format!("{} simulation error: {}", protocol, reason)
}

/// The three lines logged when a run is accepted
pub fn start_banner(request: &SimulationRequest) -> Vec<LogLine> {
    vec![
        LogLine::new(
            format!("Starting {} simulation to {}", request.protocol(), request.target()),
            LogTone::Start,
        ),
        LogLine::info(format!("Packets to send: {}", request.packets())),
        LogLine::info(format!("Request type: {}", request.kind())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tcp_templates() {
        let addr = "127.0.0.1";
        assert_eq!(
            packet_message(Protocol::Tcp, RequestKind::Syn, 1, addr, 8080),
            "TCP SYN packet 1 simulated to 127.0.0.1:8080"
        );
        assert_eq!(
            packet_message(Protocol::Tcp, RequestKind::Ack, 2, addr, 8080),
            "TCP ACK packet 2 simulated to 127.0.0.1:8080"
        );
        assert_eq!(
            packet_message(Protocol::Tcp, RequestKind::Fin, 3, addr, 8080),
            "TCP FIN packet 3 simulated to 127.0.0.1:8080"
        );
        assert_eq!(
            packet_message(Protocol::Tcp, RequestKind::Data, 4, addr, 8080),
            "TCP Data packet 4 simulated to 127.0.0.1:8080"
        );
        // UDP-only kinds fall back to the generic TCP message
        assert_eq!(
            packet_message(Protocol::Tcp, RequestKind::Broadcast, 5, addr, 8080),
            "TCP Data packet 5 simulated to 127.0.0.1:8080"
        );
    }

    #[test]
    fn test_udp_templates() {
        assert_eq!(
            packet_message(Protocol::Udp, RequestKind::Broadcast, 1, "10.0.0.1", 53),
            "UDP Broadcast packet 1 simulated"
        );
        assert_eq!(
            packet_message(Protocol::Udp, RequestKind::Multicast, 2, "10.0.0.1", 53),
            "UDP Multicast packet 2 simulated"
        );
        assert_eq!(
            packet_message(Protocol::Udp, RequestKind::Syn, 3, "10.0.0.1", 53),
            "UDP packet 3 simulated to 10.0.0.1:53"
        );
    }

    #[test]
    fn test_start_banner() {
        let request =
            SimulationRequest::new("127.0.0.1", 8080, Protocol::Tcp, RequestKind::Syn, 3).unwrap();
        let lines: Vec<String> = start_banner(&request).into_iter().map(|l| l.text).collect();
        assert_eq!(
            lines,
            vec![
                "Starting TCP simulation to 127.0.0.1:8080",
                "Packets to send: 3",
                "Request type: SYN Request",
            ]
        );
    }

    #[test]
    fn test_completion_and_error() {
        assert_eq!(completion_message(Protocol::Udp), "UDP simulation completed successfully");
        assert_eq!(
            error_message(Protocol::Tcp, "event channel closed"),
            "TCP simulation error: event channel closed"
        );
    }
}
