//! Shared model for the Z21 scanner.
//!
//! Everything that exists before the first probe is sent lives here: the scan
//! configuration, the target resolver and the host enumerator.

pub mod config;
pub mod error;
pub mod network;
pub mod utils;
