use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

use crate::domain::config::HEIGHT;
use crate::{intersect, TrieConfigBuilder, VectorTrie};

fn small_trie() -> VectorTrie<u8> {
    let config = TrieConfigBuilder::new()
        .filter_size_exponent(10)
        .build()
        .unwrap();
    VectorTrie::with_config(config).unwrap()
}

/// Recompute every presence vector from the registrant table and require
/// the node map to contain exactly the nodes on registered paths (plus the
/// root), each with exactly the recomputed vector.
fn validate_structure(trie: &VectorTrie<u8>) {
    let mut expected: HashMap<(u32, u8), u16> = HashMap::new();
    for key in trie.keys() {
        let bits = key as u32;
        for depth in 0..HEIGHT {
            let prefix = (u64::from(bits) >> (32 - 4 * u32::from(depth))) as u32;
            let child = ((u64::from(bits) >> (32 - 4 * (u32::from(depth) + 1))) & 0xF) as u16;
            *expected.entry((prefix, depth)).or_default() |= 1 << child;
        }
    }

    for (&(prefix, depth), &vector) in &expected {
        let node = trie
            .get_existing_node(prefix, depth)
            .expect("node on a registered path must exist");
        assert_eq!(
            node.vector(),
            vector,
            "vector must mirror registered paths at ({prefix}, {depth})"
        );
    }

    // Root always exists; every other node must sit on a registered path.
    let expected_count = expected.len().max(1);
    assert_eq!(trie.node_count(), expected_count, "no orphan nodes may remain");
    if expected.is_empty() {
        assert_eq!(trie.root_stats().vector, 0);
    }
}

fn trie_from(keys: &[i32]) -> VectorTrie<u8> {
    let mut trie = small_trie();
    for &key in keys {
        trie.insert(key, 0);
    }
    trie
}

/// Reference intersection over plain sets, in unsigned key order.
fn reference_intersection(sets: &[&[i32]]) -> Vec<u32> {
    let mut iter = sets.iter().map(|keys| {
        keys.iter().map(|&k| k as u32).collect::<BTreeSet<u32>>()
    });
    let first = iter.next().unwrap_or_default();
    iter.fold(first, |acc, set| acc.intersection(&set).copied().collect())
        .into_iter()
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_mutations_preserve_structure(
        keys in proptest::collection::vec(0i32..4096, 1..40),
        remove_mask in proptest::collection::vec(any::<bool>(), 40),
    ) {
        let mut trie = small_trie();
        for &key in &keys {
            trie.insert(key, 7);
        }
        validate_structure(&trie);

        for (index, &key) in keys.iter().enumerate() {
            if remove_mask[index % remove_mask.len()] {
                prop_assert!(trie.remove(key, &7), "registered payload must remove");
            }
        }
        validate_structure(&trie);
    }

    #[test]
    fn prop_insert_remove_round_trips_on_fresh_tries(key in any::<i32>()) {
        let mut trie = small_trie();
        trie.insert(key, 1);
        prop_assert!(trie.remove(key, &1));
        prop_assert_eq!(trie.node_count(), 1, "only the root may survive");
        let root = trie.root_stats();
        prop_assert_eq!(root.vector, 0);
        prop_assert_eq!(root.leaf_count, 0);
        prop_assert_eq!(root.subnode_count, 0);
    }

    #[test]
    fn prop_intersection_matches_reference(
        a in proptest::collection::vec(any::<i32>(), 0..50),
        b in proptest::collection::vec(any::<i32>(), 0..50),
        shared in proptest::collection::vec(any::<i32>(), 0..16),
    ) {
        let left: Vec<i32> = a.iter().chain(&shared).copied().collect();
        let right: Vec<i32> = b.iter().chain(&shared).copied().collect();
        let tries = vec![trie_from(&left), trie_from(&right)];

        let result: Vec<u32> = intersect(&tries, false).map(|k| k as u32).collect();
        let expected = reference_intersection(&[&left, &right]);
        prop_assert_eq!(result, expected);
    }

    #[test]
    fn prop_pruned_walk_never_invents_matches(
        a in proptest::collection::vec(0i32..100_000, 0..50),
        b in proptest::collection::vec(0i32..100_000, 0..50),
    ) {
        let tries = vec![trie_from(&a), trie_from(&b)];
        let exact: BTreeSet<i32> = intersect(&tries, false).collect();
        let filtered: Vec<i32> = intersect(&tries, true).collect();
        prop_assert!(
            filtered.iter().all(|key| exact.contains(key)),
            "filtered walk may only drop results, never add them"
        );
    }
}
