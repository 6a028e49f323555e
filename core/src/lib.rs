//! Probing engine of the Z21 scanner.
//!
//! * [`scanner`]: concurrency-limited dispatch of probes and result aggregation.
//! * [`network`]: the UDP connection used to talk to a command station.

pub mod network;
pub mod scanner;
