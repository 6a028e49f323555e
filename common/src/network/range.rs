//! # Network Blocks
//!
//! A [`NetworkBlock`] is an IPv4 address paired with a prefix length. The
//! address may still carry host bits (an interface address does), so every
//! operation here masks it down to the network address first.
//!
//! [`NetworkBlock::hosts`] expands a block into the candidate addresses that
//! are worth probing.

use std::fmt;
use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

/// Blocks with more addresses than this lose their network and broadcast address.
const MIN_STRIPPED_LEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkBlock {
    addr: Ipv4Addr,
    prefix: u8,
}

impl NetworkBlock {
    /// Creates a block, rejecting prefixes longer than 32 bits.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> anyhow::Result<Self> {
        if prefix > 32 {
            anyhow::bail!("Invalid prefix: {prefix} > 32");
        }
        Ok(Self { addr, prefix })
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn mask(&self) -> u32 {
        match self.prefix {
            0 => 0,
            p => u32::MAX << (32 - p),
        }
    }

    /// The base address with all host bits cleared.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & self.mask())
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.network()) | !self.mask())
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        u32::from(ip) & self.mask() == u32::from(self.network())
    }

    /// Walks every address of the block, network and broadcast included.
    pub fn iter(&self) -> BlockIter {
        BlockIter {
            block: *self,
            next: Some(self.network()),
        }
    }

    /// Expands the block into the addresses that should be probed.
    ///
    /// When the block holds more than two addresses the network and broadcast
    /// addresses are dropped. `/31` and `/32` blocks are returned whole so tiny
    /// subnets stay usable.
    pub fn hosts(&self) -> Vec<Ipv4Addr> {
        let mut ips: Vec<Ipv4Addr> = self.iter().collect();

        if ips.len() > MIN_STRIPPED_LEN {
            ips.pop();
            ips.remove(0);
        }
        ips
    }
}

impl From<Ipv4Network> for NetworkBlock {
    fn from(net: Ipv4Network) -> Self {
        Self {
            addr: net.ip(),
            prefix: net.prefix(),
        }
    }
}

impl fmt::Display for NetworkBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

/// Iterator over all addresses of a [`NetworkBlock`], in ascending order.
#[derive(Debug, Clone)]
pub struct BlockIter {
    block: NetworkBlock,
    next: Option<Ipv4Addr>,
}

impl Iterator for BlockIter {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|ip| self.block.contains(*ip))?;
        self.next = increment(current);
        Some(current)
    }
}

/// Adds one to the address, carrying from the last octet towards the first.
///
/// Returns `None` when the address wraps past `255.255.255.255`.
fn increment(ip: Ipv4Addr) -> Option<Ipv4Addr> {
    let mut octets = ip.octets();
    for octet in octets.iter_mut().rev() {
        let (value, overflow) = octet.overflowing_add(1);
        *octet = value;
        if !overflow {
            return Some(Ipv4Addr::from(octets));
        }
    }
    None
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
