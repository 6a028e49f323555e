//! The central **abstraction** for scanning a network for Z21 devices.
//!
//! This module defines the [`Prober`] seam that a concrete probing technique
//! (the [`z21`] prober) implements, and the [`dispatcher`] that fans probes out
//! over a candidate list under a fixed concurrency limit.
//!
//! **Architectural Note:**
//! Callers should go through [`perform_scan`] and [`reachable_only`] rather than
//! the submodules, so the probing technique can be swapped without touching
//! the CLI.

use std::net::Ipv4Addr;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use z21scan_common::config::ScanConfig;
use z21scan_common::network::result::ScanResult;

pub mod dispatcher;
pub mod gate;
pub mod z21;

pub use dispatcher::{Dispatcher, ProbeCallback};
use z21::Z21Prober;

/// A single connect + request/response exchange against one host.
///
/// Implementations never fail: every error is folded into an unreachable
/// [`ScanResult`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, ip: Ipv4Addr, cfg: &ScanConfig) -> ScanResult;
}

/// Probes every address for a Z21 device and returns all outcomes.
pub async fn perform_scan(
    ips: Vec<Ipv4Addr>,
    cfg: &ScanConfig,
    on_probe_done: Option<ProbeCallback>,
) -> anyhow::Result<Vec<ScanResult>> {
    info!(
        hosts = ips.len(),
        port = cfg.port,
        concurrency = cfg.concurrency,
        "Starting scan"
    );

    let results = Dispatcher::new(cfg.clone(), Arc::new(Z21Prober))
        .with_callback(on_probe_done)
        .run(ips)
        .await?;

    Ok(results)
}

/// Keeps the reachable hosts, preserving the incoming order.
pub fn reachable_only(results: Vec<ScanResult>) -> Vec<ScanResult> {
    results.into_iter().filter(|r| r.reachable).collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
