#![cfg(test)]

// Property tests for KeyedTable kept inside the crate so they can grow
// without feature gates if internals ever need asserting.

use crate::{InsertError, KeyedTable};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::ptr;

#[derive(Debug)]
struct Item {
    name: String,
    serial: usize,
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// items, pool length shrinks, and op lists shrink in length. Duplicate
// names in the pool are deliberate; they exercise the DuplicateKey path
// with distinct items.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Remove(usize),
    Get(usize),
    Contains(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            idx.clone().prop_map(OpI::Insert),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - Duplicate derived keys are rejected exactly when the model holds the key.
// - Successful insert returns the inserted item by pointer identity.
// - `get`/`contains_key` parity with the model, including identity of the
//   returned item reference.
// - `remove` returns the removed item iff the model held the key, and is a
//   no-op otherwise.
// - Iteration yields the model's key set and item set exactly once each.
// - `len`/`is_empty` parity with the model after every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let arena: Vec<Item> = pool
            .iter()
            .cloned()
            .enumerate()
            .map(|(serial, name)| Item { name, serial })
            .collect();
        let mut sut = KeyedTable::new(|it: &Item| it.name.as_str());
        let mut model: HashMap<String, usize> = HashMap::new();

        for op in ops {
            match op {
                OpI::Insert(i) => {
                    let item = &arena[i];
                    let already = model.contains_key(&item.name);
                    match sut.insert(item) {
                        Ok(back) => {
                            prop_assert!(!already, "insert must fail on duplicate key");
                            prop_assert!(ptr::eq(back, item), "insert must return its item");
                            model.insert(item.name.clone(), item.serial);
                        }
                        Err(InsertError::DuplicateKey) => {
                            prop_assert!(already, "duplicate error only when key exists");
                        }
                    }
                }
                OpI::Remove(i) => {
                    let key = arena[i].name.as_str();
                    let expected = model.remove(key);
                    match (sut.remove(key), expected) {
                        (Some(item), Some(serial)) => {
                            prop_assert_eq!(item.serial, serial);
                            prop_assert!(ptr::eq(item, &arena[serial]));
                        }
                        (None, None) => {}
                        (got, want) => {
                            prop_assert!(false, "remove mismatch: got {:?}, model {:?}", got.map(|i| i.serial), want);
                        }
                    }
                }
                OpI::Get(i) => {
                    let key = arena[i].name.as_str();
                    match (sut.get(key), model.get(key)) {
                        (Some(item), Some(&serial)) => {
                            prop_assert_eq!(item.serial, serial);
                            prop_assert!(ptr::eq(item, &arena[serial]));
                        }
                        (None, None) => {}
                        (got, want) => {
                            prop_assert!(false, "get mismatch: got {:?}, model {:?}", got.map(|i| i.serial), want);
                        }
                    }
                }
                OpI::Contains(s) => {
                    prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
                }
                OpI::Iterate => {
                    let keys: BTreeSet<&str> = sut.iter().map(|(k, _)| k).collect();
                    let expected_keys: BTreeSet<&str> = model.keys().map(|k| k.as_str()).collect();
                    prop_assert_eq!(keys, expected_keys);

                    let serials: BTreeSet<usize> = sut.iter().map(|(_, it)| it.serial).collect();
                    let expected_serials: BTreeSet<usize> = model.values().copied().collect();
                    prop_assert_eq!(serials, expected_serials);
                    prop_assert_eq!(sut.iter().count(), model.len());
                }
            }
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }
    }
}
