//! Resolves an interface name to the IPv4 network it is attached to.

use pnet::datalink::{self, NetworkInterface};
use tracing::debug;

use crate::error::ConfigError;
use crate::network::range::NetworkBlock;
use crate::utils::interface::NetworkInterfaceExtension;

/// Looks up `name` among the system's interfaces and returns the block of its
/// first configured IPv4 address.
pub fn network_from_interface(name: &str) -> Result<NetworkBlock, ConfigError> {
    let interfaces: Vec<NetworkInterface> = datalink::interfaces();
    debug!("Identified {} network interface(s)", interfaces.len());
    network_from_interfaces(name, &interfaces)
}

fn network_from_interfaces(
    name: &str,
    interfaces: &[NetworkInterface],
) -> Result<NetworkBlock, ConfigError> {
    let interface: &NetworkInterface = interfaces
        .iter()
        .find(|intf| intf.name == name)
        .ok_or_else(|| ConfigError::InterfaceNotFound(name.to_string()))?;

    interface
        .first_ipv4_net()
        .map(NetworkBlock::from)
        .ok_or_else(|| ConfigError::NoIPv4Address(name.to_string()))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
