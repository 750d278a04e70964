//! Property-based tests: random operation sequences checked against
//! `BTreeMap` as a reference model.

use std::collections::BTreeMap;

use proptest::prelude::*;
use skipkv::{Entry, Options, SkipMap};

// =============================================================================
// Test helpers
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Set { key: String, value: Vec<u8> },
    Remove { key: String },
}

/// Small alphabet so sets and removes collide often.
fn arbitrary_key() -> impl Strategy<Value = String> {
    "[a-e]{0,3}"
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (arbitrary_key(), prop::collection::vec(any::<u8>(), 0..16))
            .prop_map(|(key, value)| Op::Set { key, value }),
        1 => arbitrary_key().prop_map(|key| Op::Remove { key }),
    ]
}

fn apply(map: &mut SkipMap, model: &mut BTreeMap<String, Vec<u8>>, op: &Op) {
    match op {
        Op::Set { key, value } => {
            let old = map.set(key.clone(), value.clone());
            assert_eq!(old, model.insert(key.clone(), value.clone()));
        }
        Op::Remove { key } => {
            let removed = map.remove(key).map(Entry::into_parts);
            let expected = model.remove(key).map(|value| (key.clone(), value));
            assert_eq!(removed, expected);
        }
    }
}

fn model_size(model: &BTreeMap<String, Vec<u8>>) -> u64 {
    model.iter().map(|(k, v)| (k.len() + v.len()) as u64).sum()
}

// =============================================================================
// Model equivalence
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After any op sequence, contents, order, len and size match the model.
    #[test]
    fn matches_btreemap(
        ops in prop::collection::vec(arbitrary_op(), 0..200),
        max_level in 1usize..10,
        seed in any::<u64>(),
    ) {
        let mut map = SkipMap::with_options(Options::new(max_level).with_seed(seed)).unwrap();
        let mut model = BTreeMap::new();

        for op in &ops {
            apply(&mut map, &mut model, op);
        }
        map.check_invariants();

        prop_assert_eq!(map.len(), model.len());
        prop_assert_eq!(map.size(), model_size(&model));

        let actual: Vec<(&str, &[u8])> = map.iter().map(|e| (e.key(), e.value())).collect();
        let expected: Vec<(&str, &[u8])> = model.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect();
        prop_assert_eq!(actual, expected);

        for (key, value) in &model {
            prop_assert_eq!(map.get_value(key), Some(value.as_slice()));
        }
    }

    /// Walking backwards visits the same entries in reverse.
    #[test]
    fn backward_walk_mirrors_forward(
        ops in prop::collection::vec(arbitrary_op(), 0..100),
        seed in any::<u64>(),
    ) {
        let mut map = SkipMap::with_options(Options::new(6).with_seed(seed)).unwrap();
        let mut model = BTreeMap::new();
        for op in &ops {
            apply(&mut map, &mut model, op);
        }

        let mut backward = Vec::new();
        let mut cursor = map.back();
        while let Some(c) = cursor {
            backward.push(c.key());
            cursor = c.prev();
        }
        backward.reverse();

        let forward: Vec<&str> = map.iter().map(Entry::key).collect();
        prop_assert_eq!(backward, forward);
    }

    /// Removing a key twice changes nothing the second time.
    #[test]
    fn remove_is_idempotent(
        keys in prop::collection::vec(arbitrary_key(), 1..50),
        victim in arbitrary_key(),
    ) {
        let mut map = SkipMap::with_options(Options::new(5).with_seed(0)).unwrap();
        for key in &keys {
            map.set(key.clone(), key.clone());
        }
        map.remove(&victim);
        let (len, size) = (map.len(), map.size());
        prop_assert!(map.remove(&victim).is_none());
        prop_assert_eq!((map.len(), map.size()), (len, size));
        prop_assert!(map.get(&victim).is_none());
    }
}
