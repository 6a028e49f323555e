//! Bounded fan-out of probes over a list of candidate hosts.
//!
//! Every address gets exactly one probe. A probe only starts once it holds a
//! slot of the [`ProbeGate`], and [`Dispatcher::run`] returns only after every
//! spawned probe has finished, with exactly one [`ScanResult`] per address.

use std::net::Ipv4Addr;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinSet;
use tracing::{debug, warn};
use z21scan_common::config::ScanConfig;
use z21scan_common::network::result::ScanResult;

use super::Prober;
use super::gate::{GateStats, ProbeGate};

/// Invoked from the probe task as soon as its result is known.
pub type ProbeCallback = Arc<dyn Fn(&ScanResult) + Send + Sync>;

pub struct Dispatcher {
    cfg: Arc<ScanConfig>,
    prober: Arc<dyn Prober>,
    gate: ProbeGate,
    on_probe_done: Option<ProbeCallback>,
}

impl Dispatcher {
    pub fn new(cfg: ScanConfig, prober: Arc<dyn Prober>) -> Self {
        let gate = ProbeGate::new(cfg.concurrency);
        Self {
            cfg: Arc::new(cfg),
            prober,
            gate,
            on_probe_done: None,
        }
    }

    pub fn with_callback(mut self, on_probe_done: Option<ProbeCallback>) -> Self {
        self.on_probe_done = on_probe_done;
        self
    }

    pub fn gate_stats(&self) -> GateStats {
        self.gate.stats()
    }

    /// Probes every address and collects the outcomes in completion order.
    pub async fn run(&self, ips: Vec<Ipv4Addr>) -> anyhow::Result<Vec<ScanResult>> {
        let total = ips.len();
        let (tx, mut rx) = mpsc::unbounded_channel::<ScanResult>();
        let mut tasks: JoinSet<()> = JoinSet::new();

        for ip in ips {
            let permit = self.gate.acquire().await?;
            let slot = ResultSlot::new(ip, self.cfg.port, tx.clone());
            let prober = self.prober.clone();
            let cfg = self.cfg.clone();
            let on_probe_done = self.on_probe_done.clone();

            tasks.spawn(async move {
                let _permit = permit;
                let result = prober.probe(ip, &cfg).await;
                if let Some(callback) = on_probe_done {
                    callback(&result);
                }
                slot.fill(result);
            });
        }
        drop(tx);

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Probe task failed: {e}");
            }
        }

        let mut results: Vec<ScanResult> = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            results.push(result);
        }

        debug!(
            "Dispatched {} probes, collected {} results",
            total,
            results.len()
        );
        Ok(results)
    }
}

/// Write-once handle on the result channel for a single address.
///
/// Dropping an unfilled slot, e.g. while a probe task unwinds, records the
/// address as unreachable so no result is ever lost.
struct ResultSlot {
    ip: Ipv4Addr,
    port: u16,
    tx: Option<UnboundedSender<ScanResult>>,
}

impl ResultSlot {
    fn new(ip: Ipv4Addr, port: u16, tx: UnboundedSender<ScanResult>) -> Self {
        Self {
            ip,
            port,
            tx: Some(tx),
        }
    }

    fn fill(mut self, result: ScanResult) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(result);
        }
    }
}

impl Drop for ResultSlot {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(ScanResult::unreachable(self.ip, self.port));
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
