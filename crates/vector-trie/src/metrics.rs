//! Metrics hooks for intersection walks
//!
//! Read-only observability: counters describing how much work a walk did
//! and how often filter pruning fired. Nothing here participates in
//! correctness.
//!
//! ## Usage
//!
//! ```
//! use vector_trie::{intersect_recorded, Metrics, VectorTrie};
//!
//! let tries: Vec<VectorTrie<()>> = vec![VectorTrie::new(), VectorTrie::new()];
//! let metrics = Metrics::new();
//! let _results = intersect_recorded(&tries, true, &metrics);
//! let snapshot = metrics.snapshot();
//! assert!(snapshot.nodes_visited >= 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Instrumentation points the intersection engine reports into.
///
/// Every method has a no-op default, so implementors only pick up the
/// events they care about.
pub trait MetricsRecorder: Send + Sync {
    /// A (prefix, depth) pair was visited.
    fn record_node_visited(&self) {}
    /// A multiway filter estimate was computed.
    fn record_filter_probe(&self) {}
    /// A subtree was discarded on a zero filter estimate.
    fn record_subtree_pruned(&self) {}
    /// A leaf-level batch produced `count` matching keys.
    fn record_matches(&self, _count: usize) {}
}

/// Recorder that drops every event.
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {}

/// Thread-safe counters for intersection activity.
#[derive(Default)]
pub struct Metrics {
    /// Total (prefix, depth) pairs visited.
    pub nodes_visited: AtomicU64,
    /// Total multiway filter estimates computed.
    pub filter_probes: AtomicU64,
    /// Total subtrees pruned on a zero estimate.
    pub subtrees_pruned: AtomicU64,
    /// Total matching keys emitted.
    pub matches_emitted: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            nodes_visited: self.nodes_visited.load(Ordering::Relaxed),
            filter_probes: self.filter_probes.load(Ordering::Relaxed),
            subtrees_pruned: self.subtrees_pruned.load(Ordering::Relaxed),
            matches_emitted: self.matches_emitted.load(Ordering::Relaxed),
        }
    }
}

impl MetricsRecorder for Metrics {
    fn record_node_visited(&self) {
        self.nodes_visited.fetch_add(1, Ordering::Relaxed);
    }

    fn record_filter_probe(&self) {
        self.filter_probes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_subtree_pruned(&self) {
        self.subtrees_pruned.fetch_add(1, Ordering::Relaxed);
    }

    fn record_matches(&self, count: usize) {
        self.matches_emitted.fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Frozen view of a [`Metrics`] instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub nodes_visited: u64,
    pub filter_probes: u64,
    pub subtrees_pruned: u64,
    pub matches_emitted: u64,
}
