#![cfg(test)]

// Property tests for ZDict kept inside the crate so they can run
// against both hasher configurations without feature gates.

use crate::dict::ZDict;
use crate::error::Error;
use crate::mode::Mode;
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Pop(usize),
    Get(usize),
    SetDefault(usize, i32),
    Update(Vec<(usize, i32)>),
    Popitem,
    Clear,
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let batch = proptest::collection::vec((idx.clone(), any::<i32>()), 0..6);
        let op = prop_oneof![
            4 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Pop),
            3 => idx.clone().prop_map(OpI::Get),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::SetDefault(i, v)),
            1 => batch.prop_map(OpI::Update),
            1 => Just(OpI::Popitem),
            1 => Just(OpI::Clear),
            2 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn run_state_machine<S>(pool: Vec<String>, ops: Vec<OpI>, mut sut: ZDict<String, i32, S>) -> Result<(), TestCaseError>
where
    S: BuildHasher + Clone,
{
    let mut model: HashMap<String, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                let prev = sut.insert(k.clone(), v).unwrap();
                prop_assert_eq!(prev, model.insert(k, v));
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.remove(k.as_str()).unwrap(), model.remove(k));
            }
            OpI::Pop(i) => {
                let k = &pool[i];
                match (sut.pop(k.as_str()), model.remove(k)) {
                    (Ok(v), Some(mv)) => prop_assert_eq!(v, mv),
                    (Err(Error::KeyNotFound), None) => {}
                    (got, want) => {
                        return Err(TestCaseError::fail(format!(
                            "pop mismatch: {got:?} vs {want:?}"
                        )))
                    }
                }
            }
            OpI::Get(i) => {
                let k = &pool[i];
                prop_assert_eq!(sut.get(k.as_str()).unwrap(), model.get(k));
                prop_assert_eq!(sut.contains_key(k.as_str()).unwrap(), model.contains_key(k));
            }
            OpI::SetDefault(i, v) => {
                let k = pool[i].clone();
                let got = *sut.setdefault(k.clone(), v).unwrap();
                let want = *model.entry(k).or_insert(v);
                prop_assert_eq!(got, want);
            }
            OpI::Update(batch) => {
                let pairs: Vec<(String, i32)> =
                    batch.into_iter().map(|(i, v)| (pool[i].clone(), v)).collect();
                sut.update(pairs.clone()).unwrap();
                model.extend(pairs);
            }
            OpI::Popitem => match sut.popitem() {
                Ok((k, v)) => {
                    let mv = model.remove(&k);
                    prop_assert_eq!(mv, Some(v), "popitem returned a pair the model lacks");
                }
                Err(Error::KeyNotFound) => prop_assert!(model.is_empty()),
                Err(e) => return Err(TestCaseError::fail(format!("popitem: {e}"))),
            },
            OpI::Clear => {
                sut.clear().unwrap();
                model.clear();
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<String> = sut.keys().cloned().collect();
                let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
                prop_assert_eq!(sut.iter().count(), model.len());
            }
        }

        // Post-conditions after each op.
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.len() * 10 <= sut.capacity() * 7, "load factor exceeded");
    }

    // Final sweep: every model entry is reachable.
    for (k, v) in &model {
        prop_assert_eq!(sut.get(k.as_str()).unwrap(), Some(v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap
// in mutable mode. Exercised invariants:
// - insert returns the model's previous value; remove/pop/get parity.
// - setdefault inserts exactly when missing and returns the live value.
// - popitem yields an entry the model owns; len/is_empty parity and the
//   load factor bound hold after every op.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: ZDict<String, i32> = ZDict::new().unwrap();
        run_state_machine(pool, ops, sut)?;
    }
}

// Collision variant using a constant hasher to stress probing, tombstone
// traversal and tombstone reuse on one shared probe chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: ZDict<String, i32, ConstBuildHasher> =
            ZDict::with_hasher(ConstBuildHasher, Mode::Mutable).unwrap();
        run_state_machine(pool, ops, sut)?;
    }
}

// Property: insert-mode update is all-or-nothing. A batch that collides
// with an existing key leaves the dictionary untouched; a clean batch
// lands completely (last-wins within the batch).
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_insert_mode_update_is_atomic(
        seed in proptest::collection::btree_map("[a-f]", any::<i32>(), 0..4),
        batch in proptest::collection::vec(("[a-l]", any::<i32>()), 0..8),
    ) {
        let mut sut: ZDict<String, i32> =
            ZDict::from_pairs(seed.clone().into_iter(), Mode::Insert).unwrap();

        let collides = batch.iter().any(|(k, _)| seed.contains_key(k));
        let result = sut.update(batch.clone());

        if collides {
            prop_assert!(result.is_err());
            // Unchanged: exactly the seed entries remain.
            prop_assert_eq!(sut.len(), seed.len());
            for (k, v) in &seed {
                prop_assert_eq!(sut.get(k.as_str()).unwrap(), Some(v));
            }
        } else {
            prop_assert!(result.is_ok());
            let mut want: HashMap<String, i32> = seed.into_iter().collect();
            want.extend(batch);
            prop_assert_eq!(sut.len(), want.len());
            for (k, v) in &want {
                prop_assert_eq!(sut.get(k.as_str()).unwrap(), Some(v));
            }
        }
    }
}
