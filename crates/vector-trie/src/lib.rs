//! # vector-trie
//!
//! Exact conjunctive intersection of many large 32-bit key sets, computed
//! without materializing or sorting the sets. Each set is indexed by a
//! fixed-depth bit-vector trie (4-bit slices, eight levels); intersection
//! walks all tries in lock-step, ANDing 16-bit presence vectors level by
//! level, optionally pruning subtrees whose depth-seeded membership
//! filters estimate an empty overlap.
//!
//! ## Architecture
//!
//! - **Domain layer** (`domain/`): pure data-structure logic, no I/O
//!   - `VectorTrie`: one key set with lazy node materialization
//!   - `TrieNode` / `NodeHandle`: nodes addressed by packed integer
//!     handles in an owning map, never by references
//!   - `MembershipFilter` / `HashFamily`: bloom filter with depth-seeded
//!     linear-congruential hashing, comparable across tries
//!   - `intersect`: the lock-step walk producing an `IntersectionIter`
//!   - `survivors`: process-wide mask-to-offsets table
//!   - `TrieConfig`: validated construction-time tuning
//!
//! - **Error layer** (`error.rs`): construction-time failures only
//!
//! - **Metrics layer** (`metrics.rs`): read-only walk instrumentation
//!
//! ## Usage example
//!
//! ```
//! use vector_trie::{intersect, VectorTrie};
//!
//! let mut postings: Vec<VectorTrie<u64>> = Vec::new();
//! for term_docs in [[3, 11, 600], [11, 42, 600], [7, 11, 600]] {
//!     let mut trie = VectorTrie::new();
//!     for doc in term_docs {
//!         trie.insert(doc, 0);
//!     }
//!     postings.push(trie);
//! }
//!
//! let hits: Vec<i32> = intersect(&postings, false).collect();
//! assert_eq!(hits, vec![11, 600]);
//! ```
//!
//! ## Concurrency
//!
//! Everything is synchronous. A trie has exactly one mutator and no
//! internal locking; intersections only read and may run concurrently
//! over unchanging tries.

pub mod domain;
pub mod error;
pub mod metrics;

// Re-exports for convenience
pub use domain::{
    intersect, intersect_configured, intersect_recorded, survivors, HashFamily, IntersectionIter,
    MembershipFilter, NodeHandle, NodeStats, TrieConfig, TrieConfigBuilder, TrieNode, VectorTrie,
    BITS_PER_LEVEL, HEIGHT, KEY_BITS, LOG_HEIGHT,
};
pub use error::ConfigError;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};

#[cfg(test)]
mod proptests;
