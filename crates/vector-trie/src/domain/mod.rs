//! Domain layer - pure data-structure logic
//!
//! This layer contains:
//! - The bit-vector trie and its nodes
//! - The depth-seeded membership filter and its hash family
//! - The multi-way intersection engine and its result iterator
//! - The process-wide survivor table
//! - Configuration and validation
//!
//! RULES:
//! - No I/O
//! - No async code
//! - Single mutator per trie; everything else only reads

pub mod config;
pub mod hash_family;
pub mod intersect;
pub mod iter;
pub mod membership_filter;
pub mod node;
pub mod survivors;
pub mod trie;

pub use config::{TrieConfig, TrieConfigBuilder, BITS_PER_LEVEL, HEIGHT, KEY_BITS, LOG_HEIGHT};
pub use hash_family::HashFamily;
pub use intersect::{intersect, intersect_configured, intersect_recorded};
pub use iter::IntersectionIter;
pub use membership_filter::MembershipFilter;
pub use node::{NodeHandle, NodeStats, TrieNode};
pub use survivors::survivors;
pub use trie::VectorTrie;
