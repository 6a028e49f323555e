use std::net::Ipv4Addr;

use serde::Serialize;

/// Outcome of probing one host.
///
/// Serializes to `{"ip", "port", "reachable", "serial"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub reachable: bool,
    pub serial: String,
}

impl ScanResult {
    pub fn reachable(ip: Ipv4Addr, port: u16, serial: impl Into<String>) -> Self {
        Self {
            ip,
            port,
            reachable: true,
            serial: serial.into(),
        }
    }

    /// A failed or timed out probe.
    pub fn unreachable(ip: Ipv4Addr, port: u16) -> Self {
        Self {
            ip,
            port,
            reachable: false,
            serial: String::new(),
        }
    }
}
