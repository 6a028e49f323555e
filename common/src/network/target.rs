//! # Scan Target Model
//!
//! The single positional argument of the scanner names what to scan. It is
//! either:
//! * A CIDR block (e.g., `192.168.2.0/24`).
//! * A network interface (e.g., `eth0`), whose first IPv4 network is scanned.

use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::network::interface;
use crate::network::range::NetworkBlock;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    Cidr { block: NetworkBlock },
    Interface { name: String },
}

impl FromStr for Target {
    type Err = ConfigError;

    /// Anything containing a `/` must be a valid IPv4 CIDR block; everything
    /// else is taken as an interface name and checked later by [`Target::resolve`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('/') {
            return parse_cidr(s).map(|block| Target::Cidr { block });
        }

        Ok(Target::Interface {
            name: s.to_string(),
        })
    }
}

impl Target {
    /// Turns the target into a concrete network block.
    ///
    /// Interface targets query the system network configuration.
    pub fn resolve(&self) -> Result<NetworkBlock, ConfigError> {
        match self {
            Target::Cidr { block } => Ok(*block),
            Target::Interface { name } => interface::network_from_interface(name),
        }
    }
}

/// Parses CIDR notation like "192.168.2.0/24".
fn parse_cidr(s: &str) -> Result<NetworkBlock, ConfigError> {
    let Some((ip_str, prefix_str)) = s.split_once('/') else {
        return Err(ConfigError::invalid_network(s, "missing prefix length"));
    };

    let addr = ip_str
        .parse::<Ipv4Addr>()
        .map_err(|e| ConfigError::invalid_network(s, format!("bad address '{ip_str}': {e}")))?;

    let prefix = prefix_str
        .parse::<u8>()
        .map_err(|e| ConfigError::invalid_network(s, format!("bad prefix '{prefix_str}': {e}")))?;

    NetworkBlock::new(addr, prefix).map_err(|e| ConfigError::invalid_network(s, e))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
