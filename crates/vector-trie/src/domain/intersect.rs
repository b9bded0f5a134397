//! Multi-way trie intersection
//!
//! Stateless recursive descent over any number of tries at once. At each
//! (prefix, depth) pair the participating nodes' presence vectors are
//! ANDed; a node absent in any one trie contributes an all-zero vector,
//! which kills the branch with no special-casing. Surviving child offsets
//! come from the precomputed survivor table and are visited in ascending
//! order, so emitted keys are strictly ascending in unsigned order.
//!
//! With pruning enabled, a multiway membership-filter estimate gates each
//! non-leaf descent: a zero estimate discards the subtree before any exact
//! vector work. The estimate is probabilistic — this trades a small,
//! bounded risk of dropping true matches (integer rounding of the biased
//! estimate) for skipping whole subtrees, and is therefore opt-in per
//! call.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::domain::config::HEIGHT;
use crate::domain::iter::{IntersectionIter, MatchBatch};
use crate::domain::membership_filter::MembershipFilter;
use crate::domain::node::TrieNode;
use crate::domain::survivors::survivors;
use crate::domain::trie::VectorTrie;
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Intersect `tries`, yielding every key registered in all of them.
///
/// The walk completes before this returns; the iterator replays its
/// results. An empty slice yields an empty sequence; a single trie
/// enumerates its own keys.
///
/// # Panics
/// Panics if the tries were built with incompatible configurations
/// (different slicing or filter sizing — their filters would be
/// incomparable).
pub fn intersect<R>(tries: &[VectorTrie<R>], use_filter: bool) -> IntersectionIter {
    intersect_recorded(tries, use_filter, &NoOpMetrics)
}

/// [`intersect`] with the pruning default taken from the first trie's
/// configuration.
pub fn intersect_configured<R>(tries: &[VectorTrie<R>]) -> IntersectionIter {
    let use_filter = tries.first().is_some_and(|trie| trie.config().filter_pruning);
    intersect(tries, use_filter)
}

/// [`intersect`] reporting walk activity into `metrics`.
pub fn intersect_recorded<R>(
    tries: &[VectorTrie<R>],
    use_filter: bool,
    metrics: &dyn MetricsRecorder,
) -> IntersectionIter {
    if tries.is_empty() {
        return IntersectionIter::empty();
    }
    assert!(
        tries
            .windows(2)
            .all(|pair| pair[0].config().compatible_with(pair[1].config())),
        "intersected tries must share slicing and filter sizing"
    );

    debug!(tries = tries.len(), use_filter, "starting intersection walk");

    let mut walk = Walk {
        tries,
        use_filter,
        metrics,
        batches: Vec::new(),
        pruned: 0,
    };
    walk.visit(0, 0);

    debug!(
        batches = walk.batches.len(),
        pruned = walk.pruned,
        "intersection walk complete"
    );
    IntersectionIter::new(walk.batches, walk.pruned)
}

struct Walk<'a, R> {
    tries: &'a [VectorTrie<R>],
    use_filter: bool,
    metrics: &'a dyn MetricsRecorder,
    batches: Vec<MatchBatch>,
    pruned: u64,
}

impl<'a, R> Walk<'a, R> {
    fn visit(&mut self, prefix: u32, depth: u8) {
        self.metrics.record_node_visited();

        let mut nodes: SmallVec<[&'a TrieNode; 8]> = SmallVec::new();
        for trie in self.tries {
            match trie.get_existing_node(prefix, depth) {
                Some(node) => nodes.push(node),
                // Absent node: zero vector, dead branch.
                None => return,
            }
        }

        if depth == HEIGHT - 1 {
            let mask = nodes.iter().fold(u16::MAX, |acc, node| acc & node.vector());
            let offsets = survivors(mask);
            if !offsets.is_empty() {
                self.metrics.record_matches(offsets.len());
                self.batches.push(MatchBatch::new(prefix, offsets));
            }
            return;
        }

        if self.use_filter {
            self.metrics.record_filter_probe();
            let filters: SmallVec<[&MembershipFilter; 8]> =
                nodes.iter().map(|node| node.filter()).collect();
            if MembershipFilter::intersect_count_multiway(&filters) == 0 {
                trace!(prefix, depth, "filter estimate empty, pruning subtree");
                self.pruned += 1;
                self.metrics.record_subtree_pruned();
                return;
            }
        }

        let mask = nodes.iter().fold(u16::MAX, |acc, node| acc & node.vector());
        for &offset in survivors(mask) {
            self.visit((prefix << 4) | u32::from(offset), depth + 1);
        }
    }
}
