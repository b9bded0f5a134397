//! Cross-crate integration flows
//!
//! These tests drive the core through `trie-datagen`'s synthetic key sets
//! and validate every result against plain reference-set arithmetic.

pub mod intersection_flows;
