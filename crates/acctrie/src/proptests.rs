use super::*;

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Check order, binding and trie/list agreement against a model map.
fn validate(index: &AccTrie, model: &BTreeMap<Vec<u8>, Vec<String>>) {
    let leaves = index.list_leaves();
    assert_eq!(leaves.len(), model.len(), "order list must hold every key once");
    assert_eq!(index.len(), model.len());

    for pair in leaves.windows(2) {
        assert!(pair[0].key < pair[1].key, "order list must be strictly increasing");
        assert_eq!(pair[0].next_key.as_ref(), Some(&pair[1].key));
        assert_eq!(pair[1].prev_key.as_ref(), Some(&pair[0].key));
    }
    if let Some(first) = leaves.first() {
        assert!(first.prev_key.is_none());
    }
    if let Some(last) = leaves.last() {
        assert!(last.next_key.is_none());
    }

    for (leaf, (key, values)) in leaves.iter().zip(model) {
        assert_eq!(&leaf.key, key);
        assert_eq!(&leaf.values, values);
        assert!(leaf.verify(index.hash_algorithm()), "accumulator must match its bindings");
        assert_eq!(index.get(key).as_ref(), Some(values));
    }
}

#[derive(Debug, Clone)]
enum Op {
    Insert(Vec<u8>, Vec<String>),
    Delete(Vec<u8>),
    Remove(Vec<u8>, String),
}

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    // Small alphabet so keys collide and share prefixes
    prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'c', 0u8, 0xff]), 1..5)
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,3}"
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (key_strategy(), prop::collection::vec(value_strategy(), 0..3))
            .prop_map(|(k, v)| Op::Insert(k, v)),
        1 => key_strategy().prop_map(Op::Delete),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| Op::Remove(k, v)),
    ]
}

proptest! {
    #[test]
    fn prop_distinct_inserts_list_in_order(keys in prop::collection::btree_set(key_strategy(), 0..40)) {
        let index = AccTrie::default();
        let mut shuffled: Vec<_> = keys.iter().cloned().collect();
        shuffled.reverse();
        let mid = shuffled.len() / 2;
        shuffled.rotate_left(mid);
        for key in &shuffled {
            index.insert(key, ["v"]).unwrap();
        }
        let listed: Vec<_> = index.list_leaves().into_iter().map(|l| l.key).collect();
        let expected: Vec<_> = keys.into_iter().collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn prop_matches_model(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let index = AccTrie::new(HashAlgorithm::Keccak256);
        let mut model: BTreeMap<Vec<u8>, Vec<String>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, values) => {
                    index.insert(&key, values.clone()).unwrap();
                    model.entry(key).or_default().extend(values);
                }
                Op::Delete(key) => {
                    let deleted = index.delete(&key).unwrap();
                    prop_assert_eq!(deleted.map(|d| d.values), model.remove(&key));
                }
                Op::Remove(key, value) => {
                    let outcome = index.remove_values(&key, [value.clone()]).unwrap();
                    prop_assert_eq!(outcome.is_some(), model.contains_key(&key));
                    if let Some(values) = model.get_mut(&key) {
                        let before = values.len();
                        values.retain(|v| *v != value);
                        if values.is_empty() && values.len() != before {
                            model.remove(&key);
                        }
                    }
                }
            }
            validate(&index, &model);
        }
    }

    #[test]
    fn prop_proofs_verify(
        keys in prop::collection::btree_set(key_strategy(), 0..20),
        probe in key_strategy(),
    ) {
        let index = AccTrie::default();
        for key in &keys {
            index.insert(key, ["f"]).unwrap();
        }
        let proof = index.prove(&probe);
        prop_assert!(proof.verify(HashAlgorithm::Sha256, &probe));
        prop_assert_eq!(proof.values().is_some(), keys.contains(&probe));
    }
}
