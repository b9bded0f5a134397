//! End-to-end intersection flows
//!
//! Builds tries from concrete and generated key sets, intersects them with
//! and without filter pruning, and checks the results against reference
//! set intersections computed the boring way.

#![cfg(test)]

use std::collections::BTreeSet;

use trie_datagen::KeySetGenerator;
use vector_trie::{
    intersect, intersect_configured, intersect_recorded, Metrics, TrieConfigBuilder, VectorTrie,
};

use crate::init_tracing;

/// Moderate filter sizing keeps per-node allocations small while still
/// giving the pruning path real work.
fn trie_from(keys: &[i32]) -> VectorTrie<usize> {
    let config = TrieConfigBuilder::new()
        .filter_size_exponent(16)
        .build()
        .expect("valid test config");
    let mut trie = VectorTrie::with_config(config).expect("valid test config");
    for (index, &key) in keys.iter().enumerate() {
        trie.insert(key, index);
    }
    trie
}

fn reference_intersection(sets: &[&[i32]]) -> Vec<i32> {
    let mut sets = sets.iter().map(|keys| keys.iter().copied().collect::<BTreeSet<i32>>());
    let first = sets.next().unwrap_or_default();
    sets.fold(first, |acc, set| acc.intersection(&set).copied().collect())
        .into_iter()
        .collect()
}

#[test]
fn test_three_trie_scenario() {
    init_tracing();

    let set1 = [1, 17, 33, 39, 55];
    let set2 = [2, 18, 34, 40, 56, 600];
    let set3 = [4, 7, 9, 13, 17, 600];

    let mut trie1 = trie_from(&set1);
    let trie2 = trie_from(&set2);
    let trie3 = trie_from(&set3);

    for use_filter in [false, true] {
        // Disjoint by construction.
        let one_two: Vec<i32> =
            intersect(&[trie1.clone(), trie2.clone()], use_filter).collect();
        assert!(one_two.is_empty(), "trie1 and trie2 share nothing");

        // Exactly one common key.
        let one_three: Vec<i32> =
            intersect(&[trie1.clone(), trie3.clone()], use_filter).collect();
        assert_eq!(one_three, vec![17]);
    }

    // 600 joins trie1: the three-way conjunction becomes exactly {600}.
    trie1.insert(600, 0);
    for use_filter in [false, true] {
        let all: Vec<i32> =
            intersect(&[trie1.clone(), trie2.clone(), trie3.clone()], use_filter).collect();
        assert_eq!(all, vec![600]);
    }
}

#[test]
fn test_generated_sets_match_reference() {
    let mut generator = KeySetGenerator::with_seed(0xC0FFEE);
    let base = generator.uniform(4_000, 0.2);
    let second = generator.overlapping(1_500, &base, 0.3);
    let third = generator.overlapping(1_500, &base, 0.3);

    let tries = vec![trie_from(&base), trie_from(&second), trie_from(&third)];
    let result: Vec<i32> = intersect(&tries, false).collect();
    let expected = reference_intersection(&[&base, &second, &third]);

    assert_eq!(result, expected, "trie intersection must equal set intersection");
    assert!(!result.is_empty(), "overlapping generators should share keys");
}

#[test]
fn test_filtered_walk_sound_on_generated_sets() {
    let mut generator = KeySetGenerator::with_seed(0xBEEF);
    let base = generator.uniform(3_000, 0.25);
    let second = generator.overlapping(1_000, &base, 0.2);

    let tries = vec![trie_from(&base), trie_from(&second)];
    let exact: Vec<i32> = intersect(&tries, false).collect();

    let metrics = Metrics::new();
    let filtered = intersect_recorded(&tries, true, &metrics);
    let pruned = filtered.pruned_subtrees();
    let filtered: Vec<i32> = filtered.collect();

    assert!(
        filtered.iter().all(|key| exact.binary_search(key).is_ok()),
        "pruning must never introduce keys the exact walk lacks"
    );
    assert_eq!(
        metrics.snapshot().subtrees_pruned,
        pruned,
        "iterator and recorder must agree on prune count"
    );
}

#[test]
fn test_configured_default_drives_pruning() {
    let config = TrieConfigBuilder::new()
        .filter_size_exponent(16)
        .filter_pruning(false)
        .build()
        .unwrap();
    let mut a = VectorTrie::<usize>::with_config(config.clone()).unwrap();
    let mut b = VectorTrie::<usize>::with_config(config).unwrap();
    for key in [10, 20, 30] {
        a.insert(key, 0);
        b.insert(key, 0);
    }

    let result = intersect_configured(&[a, b]);
    assert_eq!(result.pruned_subtrees(), 0, "pruning disabled by configuration");
    assert_eq!(result.collect::<Vec<i32>>(), vec![10, 20, 30]);
}

#[test]
fn test_iterator_contract_on_clustered_sets() {
    let mut generator = KeySetGenerator::with_seed(31337);
    let keys = generator.clustered(2_500);
    let tries = vec![trie_from(&keys), trie_from(&keys)];

    let iter = intersect(&tries, false);
    assert_eq!(iter.len(), keys.len(), "exact size must match the distinct key count");

    let result: Vec<i32> = iter.collect();
    assert_eq!(result, keys, "self-intersection reproduces the generated set");
    assert!(
        result.windows(2).all(|pair| (pair[0] as u32) < (pair[1] as u32)),
        "results must ascend strictly in unsigned key order"
    );
}
