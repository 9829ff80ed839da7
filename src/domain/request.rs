//! Simulation requests and their (cosmetic) validation
//!
//! A `SimulationRequest` can only be obtained through validation, so the
//! runner never sees an out-of-range port or packet count.

use crate::domain::types::{Protocol, RequestKind};
use serde::Serialize;
use thiserror::Error;

pub const MIN_PACKETS: u32 = 1;
pub const MAX_PACKETS: u32 = 1000;
pub const MIN_PORT: u32 = 1;
pub const MAX_PORT: u32 = 65535;

/// Reasons a start request is rejected before any worker is spawned
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid packet count")]
    InvalidPacketCount,
    #[error("Packet count must be between 1 and 1000")]
    PacketCountOutOfRange(i64),
    #[error("Please enter a valid IP address")]
    InvalidAddress,
    #[error("Please enter a valid port number")]
    InvalidPort,
    #[error("Port must be between 1 and 65535")]
    PortOutOfRange(i64),
}

/// Raw form input, as typed by the user
#[derive(Debug, Clone, PartialEq)]
pub struct RequestInput {
    pub address: String,
    pub port: String,
    pub protocol: Protocol,
    pub kind: RequestKind,
    pub packets: String,
}

impl RequestInput {
    /// Validate in the order the form reports problems: count, address, port
    pub fn parse(&self) -> Result<SimulationRequest, ValidationError> {
        let packets = self
            .packets
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::InvalidPacketCount)?;
        let packets = check_packets(packets)?;

        let address = self.address.trim();
        if !is_dotted_quad(address) {
            return Err(ValidationError::InvalidAddress);
        }

        let port = self.port.trim().parse::<i64>().map_err(|_| ValidationError::InvalidPort)?;
        let port = check_port(port)?;

        Ok(SimulationRequest {
            address: address.to_string(),
            port,
            protocol: self.protocol,
            kind: self.kind,
            packets,
        })
    }
}

/// Immutable, validated description of one simulation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationRequest {
    address: String,
    port: u16,
    protocol: Protocol,
    kind: RequestKind,
    packets: u32,
}

impl SimulationRequest {
    pub fn new(
        address: &str,
        port: u32,
        protocol: Protocol,
        kind: RequestKind,
        packets: u32,
    ) -> Result<Self, ValidationError> {
        RequestInput {
            address: address.to_string(),
            port: port.to_string(),
            protocol,
            kind,
            packets: packets.to_string(),
        }
        .parse()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn packets(&self) -> u32 {
        self.packets
    }

    /// `address:port`
    pub fn target(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

fn check_packets(value: i64) -> Result<u32, ValidationError> {
    if value < i64::from(MIN_PACKETS) || value > i64::from(MAX_PACKETS) {
        return Err(ValidationError::PacketCountOutOfRange(value));
    }
    Ok(value as u32)
}

fn check_port(value: i64) -> Result<u16, ValidationError> {
    if value < i64::from(MIN_PORT) || value > i64::from(MAX_PORT) {
        return Err(ValidationError::PortOutOfRange(value));
    }
    Ok(value as u16)
}

/// Exactly four dot-separated decimal octets (0-255), digits only
fn is_dotted_quad(address: &str) -> bool {
    let parts: Vec<&str> = address.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) && part.parse::<u8>().is_ok()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(address: &str, port: &str, packets: &str) -> RequestInput {
        RequestInput {
            address: address.to_string(),
            port: port.to_string(),
            protocol: Protocol::Tcp,
            kind: RequestKind::Syn,
            packets: packets.to_string(),
        }
    }

    #[test]
    fn test_address_boundaries() {
        assert_eq!(input("1.2.3", "80", "1").parse(), Err(ValidationError::InvalidAddress));
        assert!(input("1.2.3.4", "80", "1").parse().is_ok());
        assert_eq!(input("1.2.3.4.5", "80", "1").parse(), Err(ValidationError::InvalidAddress));
        assert_eq!(input("1..3.4", "80", "1").parse(), Err(ValidationError::InvalidAddress));
        assert_eq!(input("a.b.c.d", "80", "1").parse(), Err(ValidationError::InvalidAddress));
        assert_eq!(input("1.2.3.+4", "80", "1").parse(), Err(ValidationError::InvalidAddress));
        assert_eq!(input("256.0.0.1", "80", "1").parse(), Err(ValidationError::InvalidAddress));
        assert_eq!(input("", "80", "1").parse(), Err(ValidationError::InvalidAddress));
    }

    #[test]
    fn test_port_boundaries() {
        assert_eq!(input("1.2.3.4", "0", "1").parse(), Err(ValidationError::PortOutOfRange(0)));
        assert_eq!(
            input("1.2.3.4", "65536", "1").parse(),
            Err(ValidationError::PortOutOfRange(65536))
        );
        assert_eq!(input("1.2.3.4", "1", "1").parse().unwrap().port(), 1);
        assert_eq!(input("1.2.3.4", "65535", "1").parse().unwrap().port(), 65535);
        assert_eq!(input("1.2.3.4", "http", "1").parse(), Err(ValidationError::InvalidPort));
    }

    #[test]
    fn test_packet_count_boundaries() {
        assert_eq!(
            input("1.2.3.4", "80", "0").parse(),
            Err(ValidationError::PacketCountOutOfRange(0))
        );
        assert_eq!(
            input("1.2.3.4", "80", "1001").parse(),
            Err(ValidationError::PacketCountOutOfRange(1001))
        );
        assert_eq!(input("1.2.3.4", "80", "1").parse().unwrap().packets(), 1);
        assert_eq!(input("1.2.3.4", "80", "1000").parse().unwrap().packets(), 1000);
        assert_eq!(input("1.2.3.4", "80", "five").parse(), Err(ValidationError::InvalidPacketCount));
    }

    #[test]
    fn test_packet_count_checked_before_address() {
        // Both are wrong; the count is reported first
        assert_eq!(input("bogus", "80", "0").parse(), Err(ValidationError::PacketCountOutOfRange(0)));
        assert_eq!(input("bogus", "0", "3").parse(), Err(ValidationError::InvalidAddress));
    }

    #[test]
    fn test_input_is_trimmed() {
        let request = input(" 127.0.0.1 ", " 8080", "3 ").parse().unwrap();
        assert_eq!(request.address(), "127.0.0.1");
        assert_eq!(request.target(), "127.0.0.1:8080");
        assert_eq!(request.packets(), 3);
    }

    #[test]
    fn test_new_validates() {
        assert!(SimulationRequest::new("10.0.0.1", 65536, Protocol::Udp, RequestKind::Data, 1)
            .is_err());
        let request =
            SimulationRequest::new("10.0.0.1", 53, Protocol::Udp, RequestKind::Data, 10).unwrap();
        assert_eq!(request.protocol(), Protocol::Udp);
        assert_eq!(request.kind(), RequestKind::Data);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ValidationError::PortOutOfRange(0).to_string(),
            "Port must be between 1 and 65535"
        );
        assert_eq!(ValidationError::InvalidAddress.to_string(), "Please enter a valid IP address");
    }
}
