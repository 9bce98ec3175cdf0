//! End-to-end tests of the public trie surface: registration, wildcard
//! resolution, removal compaction and ordered iteration, including
//! model-based property tests against `BTreeMap`.

use std::collections::{BTreeMap, BTreeSet};

use quickcheck::quickcheck;
use rand::prelude::*;
use radix_compact::{Error, Trie};

fn collect_keys(trie: &Trie) -> Vec<Vec<u8>> {
    trie.keys()
}

#[test]
fn test_basic_registration_and_order() {
    let mut trie = Trie::new(0);
    trie.insert(b"car");
    trie.insert(b"cat");
    trie.insert(b"dog");

    assert!(trie.contains(b"car"));
    assert!(!trie.contains(b"ca"));
    assert!(!trie.contains(b"cars"));
    assert_eq!(
        collect_keys(&trie),
        vec![b"car".to_vec(), b"cat".to_vec(), b"dog".to_vec()]
    );
}

#[test]
fn test_wildcard_resolves_extensions() {
    let mut trie = Trie::new(2);
    trie.insert_wildcard(b"foo").copy_from_slice(b"fw");

    assert_eq!(trie.find(b"foobar"), Some(&b"fw"[..]));
    assert_eq!(trie.find(b"foo"), Some(&b"fw"[..]));
    assert!(!trie.contains(b"bar"));
    assert!(!trie.contains(b"fo"));
}

#[test]
fn test_branch_word_survives_sibling_removal() {
    let mut trie = Trie::new(0);
    trie.insert(b"ab");
    trie.insert(b"abc");
    trie.insert(b"abd");

    trie.remove(b"abc").unwrap();
    assert!(!trie.contains(b"abc"));
    assert!(trie.contains(b"ab"));
    assert!(trie.contains(b"abd"));
    assert_eq!(collect_keys(&trie), vec![b"ab".to_vec(), b"abd".to_vec()]);
}

#[test]
fn test_single_key_roundtrip_leaves_empty_trie() {
    let mut trie = Trie::new(0);
    trie.insert(b"x");
    trie.remove(b"x").unwrap();

    assert!(!trie.contains(b"x"));
    assert!(trie.is_empty());
    assert!(collect_keys(&trie).is_empty());
    assert_eq!(trie.remove(b"x"), Err(Error::KeyNotFound));
}

#[test]
fn test_dense_fanout_under_root() {
    let mut trie = Trie::new(1);
    for b in 1..=255u8 {
        trie.insert(&[b])[0] = b;
    }

    assert_eq!(trie.len(), 255);
    for b in 1..=255u8 {
        assert_eq!(trie.find(&[b]), Some(&[b][..]));
    }
    let keys = collect_keys(&trie);
    assert_eq!(keys.len(), 255);
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_deepest_wildcard_wins() {
    let mut trie = Trie::new(1);
    trie.insert_wildcard(b"a")[0] = 1;
    trie.insert_wildcard(b"ab")[0] = 2;

    assert_eq!(trie.find(b"abc"), Some(&[2u8][..]));
    assert_eq!(trie.find(b"azz"), Some(&[1u8][..]));
}

#[test]
fn test_empty_key_absent_until_inserted() {
    let mut trie = Trie::new(0);
    assert!(!trie.contains(b""));

    trie.insert(b"");
    assert!(trie.contains(b""));
    assert_eq!(collect_keys(&trie), vec![Vec::<u8>::new()]);
}

#[test]
fn test_slot_stable_across_reinserts_and_splits() {
    let mut trie = Trie::new(8);
    let mut rng = StdRng::seed_from_u64(0x5eed);

    let mut keys = Vec::new();
    for _ in 0..1024 {
        let len = rng.gen_range(0..100);
        let key: Vec<u8> = (0..len).map(|_| rng.gen_range(b'a'..=b'f')).collect();
        keys.push(key);
    }
    for key in &keys {
        let stamp = stamp_for(key);
        trie.insert(key).copy_from_slice(&stamp);
    }
    for key in &keys {
        let stamp = stamp_for(key);
        assert_eq!(trie.find(key), Some(&stamp[..]));
        // Re-inserting must return the original slot, contents intact.
        assert_eq!(&*trie.insert(key), &stamp[..]);
    }
}

fn stamp_for(key: &[u8]) -> [u8; 8] {
    let mut stamp = [0xa5u8; 8];
    for (i, &b) in key.iter().enumerate() {
        stamp[i % 8] ^= b.wrapping_mul(31).wrapping_add(i as u8);
    }
    stamp
}

#[test]
fn test_enumerates_generated_keys_in_order() {
    let mut expected = Vec::new();
    for a in b'a'..=b'e' {
        for b in b'a'..=b'e' {
            for c in b'a'..=b'e' {
                expected.push(vec![a, b, c]);
            }
        }
    }

    let mut shuffled = expected.clone();
    shuffled.shuffle(&mut StdRng::seed_from_u64(42));

    let mut trie = Trie::new(0);
    for key in &shuffled {
        trie.insert(key);
    }
    assert_eq!(collect_keys(&trie), expected);
}

#[test]
fn test_disjoint_membership_after_removals() {
    // Move keys one by one from trie `a` to trie `b`; at every step each key
    // must be in exactly one of the two.
    let keys: Vec<Vec<u8>> = (0..4u8)
        .flat_map(|x| (0..4u8).flat_map(move |y| (0..4u8).map(move |z| vec![x, y, z])))
        .collect();

    let mut a = Trie::new(0);
    let mut b = Trie::new(0);
    for key in &keys {
        a.insert(key);
    }

    for (moved, key) in keys.iter().enumerate() {
        a.remove(key).unwrap();
        b.insert(key);
        for (i, probe) in keys.iter().enumerate() {
            assert_eq!(a.contains(probe), i > moved);
            assert_eq!(b.contains(probe), i <= moved);
        }
    }
    assert!(a.is_empty());
    assert_eq!(b.len(), keys.len());
}

#[test]
fn test_randomized_churn_against_model() {
    let mut rng = StdRng::seed_from_u64(0xdecade);
    let mut trie = Trie::new(0);
    let mut model: BTreeSet<Vec<u8>> = BTreeSet::new();

    for round in 0..2000 {
        let len = rng.gen_range(0..6);
        let key: Vec<u8> = (0..len).map(|_| rng.gen_range(b'a'..=b'c')).collect();

        if rng.gen_bool(0.6) {
            trie.insert(&key);
            model.insert(key);
        } else {
            let expected = if model.remove(&key) {
                Ok(())
            } else {
                Err(Error::KeyNotFound)
            };
            assert_eq!(trie.remove(&key), expected);
        }
        assert_eq!(trie.len(), model.len());

        if round % 100 == 0 {
            let keys: Vec<Vec<u8>> = model.iter().cloned().collect();
            assert_eq!(collect_keys(&trie), keys);
        }
    }
    assert_eq!(
        collect_keys(&trie),
        model.iter().cloned().collect::<Vec<_>>()
    );
}

quickcheck! {
    fn prop_membership_matches_model(keys: Vec<Vec<u8>>, probes: Vec<Vec<u8>>) -> bool {
        let mut trie = Trie::new(0);
        let model: BTreeSet<Vec<u8>> = keys.iter().cloned().collect();
        for key in &keys {
            trie.insert(key);
        }
        keys.iter().all(|k| trie.contains(k))
            && probes.iter().all(|p| trie.contains(p) == model.contains(p))
            && trie.len() == model.len()
    }

    fn prop_iteration_is_sorted_and_complete(keys: Vec<Vec<u8>>) -> bool {
        let mut trie = Trie::new(0);
        for key in &keys {
            trie.insert(key);
        }
        let model: Vec<Vec<u8>> = keys.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        trie.keys() == model
    }

    fn prop_removal_matches_model(keys: Vec<Vec<u8>>) -> bool {
        let mut trie = Trie::new(1);
        let mut model: BTreeMap<Vec<u8>, u8> = BTreeMap::new();
        for (i, key) in keys.iter().enumerate() {
            trie.insert(key)[0] = i as u8;
            model.insert(key.clone(), i as u8);
        }
        // Remove every other distinct key.
        let distinct: Vec<Vec<u8>> = model.keys().cloned().collect();
        for key in distinct.iter().step_by(2) {
            if trie.remove(key).is_err() {
                return false;
            }
            model.remove(key);
        }
        model.iter().all(|(k, v)| trie.find(k) == Some(&[*v][..]))
            && distinct.iter().step_by(2).all(|k| !trie.contains(k))
            && trie.keys() == model.keys().cloned().collect::<Vec<_>>()
    }
}
