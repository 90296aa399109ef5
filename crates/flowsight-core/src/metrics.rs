//! Global atomic counters for normalization throughput.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. before a process exits).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lock-free atomic counters.
pub struct Metrics {
    events_normalized: AtomicU64,
    nodes_emitted: AtomicU64,
    edges_inferred: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            events_normalized: AtomicU64::new(0),
            nodes_emitted: AtomicU64::new(0),
            edges_inferred: AtomicU64::new(0),
        }
    }

    /// Record one finished normalization.
    pub fn record_normalization(&self, events: usize, nodes: usize, edges: usize) {
        self.events_normalized
            .fetch_add(events as u64, Ordering::Relaxed);
        self.nodes_emitted.fetch_add(nodes as u64, Ordering::Relaxed);
        self.edges_inferred.fetch_add(edges as u64, Ordering::Relaxed);
        tracing::trace!(metric = "normalization", "counters incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            events_normalized = self.events_normalized(),
            nodes_emitted = self.nodes_emitted(),
            edges_inferred = self.edges_inferred(),
        );
    }

    pub fn events_normalized(&self) -> u64 {
        self.events_normalized.load(Ordering::Relaxed)
    }

    pub fn nodes_emitted(&self) -> u64 {
        self.nodes_emitted.load(Ordering::Relaxed)
    }

    pub fn edges_inferred(&self) -> u64 {
        self.edges_inferred.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.events_normalized.store(0, Ordering::Relaxed);
        self.nodes_emitted.store(0, Ordering::Relaxed);
        self.edges_inferred.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let m = Metrics::new();
        assert_eq!(m.events_normalized(), 0);
        m.record_normalization(8, 8, 3);
        m.record_normalization(2, 2, 0);
        assert_eq!(m.events_normalized(), 10);
        assert_eq!(m.nodes_emitted(), 10);
        assert_eq!(m.edges_inferred(), 3);
    }

    #[test]
    fn reset_zeroes_all() {
        let m = Metrics::new();
        m.record_normalization(1, 1, 1);
        m.reset();
        assert_eq!(m.events_normalized(), 0);
        assert_eq!(m.nodes_emitted(), 0);
        assert_eq!(m.edges_inferred(), 0);
    }
}
