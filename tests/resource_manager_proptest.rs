use proptest::prelude::*;
use resource_cache::{Resource, ResourceKey, ResourceManager, ResourceRef, SharedManager};
use std::collections::HashMap;

struct Blob(String);

impl Resource for Blob {
    type Error = String;

    fn load(key: &ResourceKey) -> Result<Self, String> {
        if key.dedup_key().starts_with("bad") {
            return Err(key.dedup_key().to_string());
        }
        Ok(Blob(key.dedup_key().to_string()))
    }
}

#[derive(Clone, Debug)]
enum Op {
    Load(usize),
    LoadBad,
    Unload(usize),
}

fn arb_ops() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        4 => (0usize..6).prop_map(Op::Load),
        1 => Just(Op::LoadBad),
        4 => (0usize..10).prop_map(Op::Unload),
    ];
    proptest::collection::vec(op, 1..120)
}

// Model the manager with plain collections and compare after every step.
// Invariants exercised:
// - Refcount conservation: count = loads − unloads for the live id.
// - Dedup: a live key always maps to the same id.
// - LIFO reuse: a miss takes the top of the modelled free stack, else appends.
// - Tolerance: unloading a free or unknown id leaves everything unchanged.
// - Atomicity: failed constructions leave the model untouched.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_model(ops in arb_ops()) {
        let mut sut: ResourceManager<Blob> = ResourceManager::new();
        // id -> (key, count)
        let mut live: HashMap<usize, (String, usize)> = HashMap::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut free: Vec<usize> = Vec::new();
        let mut slots = 0usize;

        for op in ops {
            match op {
                Op::Load(k) => {
                    let key = format!("k{}", k);
                    let id = sut.load(&[&key]).unwrap();
                    match by_key.get(&key) {
                        Some(&expected) => {
                            prop_assert_eq!(id, expected);
                            live.get_mut(&id).unwrap().1 += 1;
                        }
                        None => {
                            let expected = free.pop().unwrap_or_else(|| { slots += 1; slots - 1 });
                            prop_assert_eq!(id, expected);
                            live.insert(id, (key.clone(), 1));
                            by_key.insert(key, id);
                        }
                    }
                }
                Op::LoadBad => {
                    prop_assert!(sut.load(&["bad.png"]).is_err());
                }
                Op::Unload(id) => {
                    let destroyed = match live.get_mut(&id) {
                        Some(entry) => {
                            entry.1 -= 1;
                            entry.1 == 0
                        }
                        None => false,
                    };
                    if destroyed {
                        let (key, _) = live.remove(&id).unwrap();
                        by_key.remove(&key);
                        free.push(id);
                    }
                    sut.unload(id);
                }
            }

            prop_assert_eq!(sut.len(), live.len());
            prop_assert_eq!(sut.slot_count(), slots);
            prop_assert_eq!(sut.free_ids(), free.as_slice());
            for (id, (key, count)) in &live {
                prop_assert_eq!(sut.reference_count(*id), Some(*count));
                prop_assert_eq!(sut.find(key), Some(*id));
                prop_assert_eq!(&sut.get(*id).0, key);
            }
            for id in &free {
                prop_assert_eq!(sut.reference_count(*id), None);
            }
            prop_assert!(!sut.contains_key("bad.png"));
        }
    }
}

// Handle-level liveness: a key is cached iff some ResourceRef for it is alive.
proptest! {
    #[test]
    fn prop_handle_liveness(keys in 1usize..=5, ops in proptest::collection::vec((0u8..=3u8, 0usize..100usize), 1..100)) {
        let m: SharedManager<Blob> = SharedManager::new();
        let mut held: Vec<Vec<ResourceRef<Blob>>> = std::iter::repeat_with(Vec::new).take(keys).collect();

        for (op, raw_k) in ops {
            let k = raw_k % keys;
            let key = format!("k{}", k);
            match op {
                // Load a fresh handle
                0 => held[k].push(m.load(&[&key]).unwrap()),
                // Clone one existing handle
                1 => {
                    if let Some(c) = held[k].last().cloned() {
                        held[k].push(c);
                    }
                }
                // Drop one handle
                2 => {
                    held[k].pop();
                }
                // Drop all handles for this key
                3 => held[k].clear(),
                _ => unreachable!(),
            }

            prop_assert_eq!(m.contains_key(&key), !held[k].is_empty());
            if let Some(r) = held[k].last() {
                prop_assert_eq!(r.reference_count(), held[k].len());
                prop_assert_eq!(r.get().0.clone(), key.clone());
            }
        }

        let expected_len = held.iter().filter(|v| !v.is_empty()).count();
        prop_assert_eq!(m.len(), expected_len);
        drop(held);
        prop_assert!(m.is_empty());
    }
}
