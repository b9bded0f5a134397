//! Bit-vector trie over 32-bit keys
//!
//! One trie indexes one key set. Keys are consumed most-significant-nibble
//! first across eight levels; each level's node records which children
//! exist in a 16-bit presence vector, carries aggregate counters, and
//! folds every key passing through it into a depth-seeded membership
//! filter. Nodes live in an owning map keyed by packed handles and are
//! materialized lazily on insert; read paths never create nodes.
//!
//! The registrant table buckets opaque payloads by full key. A key is
//! "present" exactly while at least one payload is registered for it, and
//! the leaf-level presence bit tracks that condition.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::domain::config::{TrieConfig, BITS_PER_LEVEL, HEIGHT, KEY_BITS};
use crate::domain::hash_family::HashFamily;
use crate::domain::node::{NodeHandle, NodeStats, TrieNode};
use crate::error::ConfigError;

/// Outcome of the leaf-level half of a removal.
enum LeafRemoval {
    /// No registrants for the key, or the payload was not among them.
    NotFound,
    /// A payload was removed; `leaf_bit_cleared` is true when it was the
    /// last one and the leaf presence bit went away with it.
    Removed { leaf_bit_cleared: bool },
}

/// Prefix of `bits` at `depth`: its top `4 * depth` bits as an integer.
#[inline]
fn prefix_at(bits: u32, depth: u8) -> u32 {
    // Widening first keeps the depth-0 case (a shift by the full key
    // width) well-defined.
    (u64::from(bits) >> (u32::from(KEY_BITS) - u32::from(BITS_PER_LEVEL) * u32::from(depth))) as u32
}

/// One key set, indexed for lock-step intersection.
///
/// `R` is the payload registered alongside each key; the trie never
/// inspects it beyond the equality used by [`remove`](Self::remove).
///
/// # Example
///
/// ```
/// use vector_trie::{intersect, VectorTrie};
///
/// let mut a = VectorTrie::new();
/// let mut b = VectorTrie::new();
/// for key in [1, 17, 33] {
///     a.insert(key, ());
/// }
/// for key in [17, 600] {
///     b.insert(key, ());
/// }
///
/// let tries = [a, b];
/// let common: Vec<i32> = intersect(&tries, false).collect();
/// assert_eq!(common, vec![17]);
/// ```
#[derive(Clone, Debug)]
pub struct VectorTrie<R> {
    config: TrieConfig,
    /// One shared hash family per depth; every node at a depth indexes its
    /// filter identically, here and in every compatibly-configured trie.
    families: Vec<Arc<HashFamily>>,
    /// Owning node storage, keyed by packed (prefix, depth) handles.
    nodes: HashMap<NodeHandle, TrieNode>,
    /// Payloads bucketed by full key. Entries are removed when their list
    /// empties; an empty list is never left behind.
    registrants: HashMap<i32, Vec<R>>,
}

impl<R> VectorTrie<R> {
    /// Empty trie with the default configuration. Only the root node is
    /// materialized.
    pub fn new() -> Self {
        Self::with_config(TrieConfig::default()).expect("default configuration is valid")
    }

    /// Empty trie with an explicit configuration.
    ///
    /// Validates the configuration and derives the per-depth hash
    /// families, so every later operation is infallible.
    pub fn with_config(config: TrieConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let families = (0..HEIGHT)
            .map(|depth| {
                HashFamily::derive(
                    u64::from(depth),
                    config.filter_size_bits(depth),
                    config.expected_elements(depth),
                )
                .map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut trie = Self {
            config,
            families,
            nodes: HashMap::new(),
            registrants: HashMap::new(),
        };
        trie.get_or_create_node(0, 0);
        Ok(trie)
    }

    /// Register `payload` under `key`.
    ///
    /// Materializes the key's node path as needed and updates the
    /// aggregate counters: every touched node's `leaf_count` grows (the
    /// leaf only when its presence bit is new), `subnode_count` grows
    /// exactly where the level below gained a new branch, and every
    /// non-leaf node on the path absorbs the key into its filter.
    pub fn insert(&mut self, key: i32, payload: R) {
        let bits = key as u32;
        let mut lower_changed = self.insert_at_leaf(key, payload);

        for depth in (0..HEIGHT - 1).rev() {
            let prefix = prefix_at(bits, depth);
            let nibble = prefix_at(bits, depth + 1) & 0xF;
            let value_bit = 1u16 << nibble;

            let node = self.get_or_create_node(prefix, depth);
            let changed = node.vector() & value_bit == 0;
            node.add_leaves(1);
            if lower_changed {
                node.add_subnodes(1);
            }
            node.set_vector(node.vector() | value_bit);
            node.filter_add(i64::from(key));

            lower_changed = changed;
        }
    }

    fn insert_at_leaf(&mut self, key: i32, payload: R) -> bool {
        let bits = key as u32;
        let prefix = bits >> BITS_PER_LEVEL;
        let value_bit = 1u16 << (bits & 0xF);

        let node = self.get_or_create_node(prefix, HEIGHT - 1);
        let changed = node.vector() & value_bit == 0;
        if changed {
            node.add_leaves(1);
        }
        node.set_vector(node.vector() | value_bit);

        self.registrants.entry(key).or_default().push(payload);
        changed
    }

    /// Remove one registration of `payload` under `key`.
    ///
    /// Returns `true` iff a payload was removed. `false` means nothing was
    /// registered to remove; the trie is untouched. When the last payload
    /// for a key goes away, the leaf presence bit is cleared and emptied
    /// nodes are deleted bottom-up; cleanup stops at the first ancestor
    /// that still covers other keys, and counters above that frontier
    /// deliberately keep their values (the loop performs no further
    /// writes, only the remaining lookups).
    pub fn remove(&mut self, key: i32, payload: &R) -> bool
    where
        R: PartialEq,
    {
        let leaf_bit_cleared = match self.remove_at_leaf(key, payload) {
            LeafRemoval::NotFound => return false,
            LeafRemoval::Removed { leaf_bit_cleared } => leaf_bit_cleared,
        };
        if !leaf_bit_cleared {
            // Other payloads keep the key registered; no structure moved.
            return true;
        }

        let bits = key as u32;
        for depth in (0..HEIGHT - 1).rev() {
            let lower_prefix = prefix_at(bits, depth + 1);
            let lower_handle = NodeHandle::new(lower_prefix, depth + 1);
            let lower_vector = self
                .nodes
                .get(&lower_handle)
                .expect("path node missing during removal")
                .vector();
            if lower_vector != 0 {
                continue;
            }

            trace!(prefix = lower_prefix, depth = depth + 1, "deleting emptied node");
            self.nodes.remove(&lower_handle);

            let value_bit = 1u16 << (lower_prefix & 0xF);
            let node = self
                .nodes
                .get_mut(&NodeHandle::new(prefix_at(bits, depth), depth))
                .expect("ancestor node missing during removal");
            let changed = node.vector() & value_bit != 0;
            node.add_leaves(-1);
            if changed {
                node.add_subnodes(-1);
            }
            node.set_vector(node.vector() & !value_bit);
        }
        true
    }

    fn remove_at_leaf(&mut self, key: i32, payload: &R) -> LeafRemoval
    where
        R: PartialEq,
    {
        let Some(list) = self.registrants.get_mut(&key) else {
            debug!(key, "remove: no registrants for key");
            return LeafRemoval::NotFound;
        };
        let Some(index) = list.iter().position(|candidate| candidate == payload) else {
            debug!(key, "remove: payload not registered for key");
            return LeafRemoval::NotFound;
        };
        list.remove(index);
        if !list.is_empty() {
            return LeafRemoval::Removed {
                leaf_bit_cleared: false,
            };
        }
        self.registrants.remove(&key);

        let bits = key as u32;
        let prefix = bits >> BITS_PER_LEVEL;
        let value_bit = 1u16 << (bits & 0xF);
        let node = self
            .nodes
            .get_mut(&NodeHandle::new(prefix, HEIGHT - 1))
            .expect("leaf node missing for registered key");
        let cleared = node.vector() & value_bit != 0;
        if cleared {
            node.add_leaves(-1);
        }
        node.set_vector(node.vector() & !value_bit);
        LeafRemoval::Removed {
            leaf_bit_cleared: cleared,
        }
    }

    /// Node at `(prefix, depth)`, materializing it (filter included) on
    /// first touch.
    pub(crate) fn get_or_create_node(&mut self, prefix: u32, depth: u8) -> &mut TrieNode {
        let handle = NodeHandle::new(prefix, depth);
        self.nodes.entry(handle).or_insert_with(|| {
            trace!(prefix, depth, "materializing node");
            TrieNode::new(Arc::clone(&self.families[usize::from(depth)]))
        })
    }

    /// Node at `(prefix, depth)` if it exists. Read paths use this
    /// exclusively: a query never materializes nodes.
    pub fn get_existing_node(&self, prefix: u32, depth: u8) -> Option<&TrieNode> {
        self.nodes.get(&NodeHandle::new(prefix, depth))
    }

    /// The configuration this trie was built with.
    pub fn config(&self) -> &TrieConfig {
        &self.config
    }

    /// Number of distinct registered keys.
    pub fn len(&self) -> usize {
        self.registrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrants.is_empty()
    }

    /// Whether at least one payload is registered under `key`.
    pub fn contains_key(&self, key: i32) -> bool {
        self.registrants.contains_key(&key)
    }

    /// Payloads registered under `key`, if any. Never an empty slice.
    pub fn registrants(&self, key: i32) -> Option<&[R]> {
        self.registrants.get(&key).map(Vec::as_slice)
    }

    /// Distinct registered keys, in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = i32> + '_ {
        self.registrants.keys().copied()
    }

    /// Number of materialized nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bookkeeping snapshot of the root node.
    pub fn root_stats(&self) -> NodeStats {
        self.get_existing_node(0, 0)
            .expect("root node always exists")
            .stats()
    }

    /// Bookkeeping snapshot of an arbitrary node, if materialized.
    pub fn node_stats(&self, prefix: u32, depth: u8) -> Option<NodeStats> {
        self.get_existing_node(prefix, depth).map(TrieNode::stats)
    }
}

impl<R> Default for VectorTrie<R> {
    fn default() -> Self {
        Self::new()
    }
}
