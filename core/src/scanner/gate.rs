//! Fixed-capacity admission gate for probes.
//!
//! Wraps a [`Semaphore`] and counts every acquire and release, so the number of
//! probes in flight can be checked after a scan.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Context;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug, Default)]
struct GateCounters {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

/// Snapshot of the gate counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStats {
    pub capacity: usize,
    pub acquired: usize,
    pub released: usize,
    pub in_flight: usize,
    /// Highest number of permits held at the same time.
    pub peak: usize,
}

#[derive(Debug)]
pub struct ProbeGate {
    capacity: usize,
    semaphore: Arc<Semaphore>,
    counters: Arc<GateCounters>,
}

impl ProbeGate {
    /// Creates a gate admitting `capacity` holders at once (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, Semaphore::MAX_PERMITS);
        Self {
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
            counters: Arc::new(GateCounters::default()),
        }
    }

    /// Waits for a free slot. The slot is given back when the permit is dropped.
    pub async fn acquire(&self) -> anyhow::Result<GatePermit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .context("probe gate closed")?;

        let now = self.counters.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(now, Ordering::SeqCst);
        self.counters.acquired.fetch_add(1, Ordering::SeqCst);

        Ok(GatePermit {
            _permit: permit,
            counters: self.counters.clone(),
        })
    }

    pub fn stats(&self) -> GateStats {
        GateStats {
            capacity: self.capacity,
            acquired: self.counters.acquired.load(Ordering::SeqCst),
            released: self.counters.released.load(Ordering::SeqCst),
            in_flight: self.counters.in_flight.load(Ordering::SeqCst),
            peak: self.counters.peak.load(Ordering::SeqCst),
        }
    }
}

pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
    counters: Arc<GateCounters>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.counters.released.fetch_add(1, Ordering::SeqCst);
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn permits_are_counted_and_released_on_drop() {
        let gate = ProbeGate::new(2);
        let a = gate.acquire().await.unwrap();
        let b = gate.acquire().await.unwrap();
        assert_eq!(gate.stats().in_flight, 2);

        drop(a);
        drop(b);
        let stats = gate.stats();
        assert_eq!(stats.acquired, 2);
        assert_eq!(stats.released, 2);
        assert_eq!(stats.in_flight, 0);
        assert_eq!(stats.peak, 2);
    }

    #[tokio::test]
    async fn full_gate_blocks_until_release() {
        let gate = ProbeGate::new(1);
        let held = gate.acquire().await.unwrap();

        let blocked = tokio::time::timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(blocked.is_err(), "second acquire should wait");

        drop(held);
        let next = tokio::time::timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(next.is_ok());
    }

    #[tokio::test]
    async fn permit_is_released_when_task_panics() {
        let gate = ProbeGate::new(1);
        let permit = gate.acquire().await.unwrap();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let reply: Option<u32> = None;
            reply.expect("probe blew up");
        });
        assert!(handle.await.unwrap_err().is_panic());

        let stats = gate.stats();
        assert_eq!(stats.released, 1);
        assert_eq!(stats.in_flight, 0);
        assert!(gate.acquire().await.is_ok());
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        assert_eq!(ProbeGate::new(0).stats().capacity, 1);
    }
}
