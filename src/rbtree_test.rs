use arbitrary::{self, unstructured::Unstructured, Arbitrary};
use rand::{prelude::random, rngs::SmallRng, seq::SliceRandom, Rng, SeedableRng};

use super::*;
use crate::node::Color;

use std::{
    collections::BTreeMap,
    ops::Bound::{Excluded, Unbounded},
};

fn keys<K: Clone, V, C>(index: &RbTree<K, V, C>) -> Vec<K> {
    index.iter().map(|(k, _)| k.clone()).collect()
}

#[test]
fn test_insert_single() {
    let mut index: RbTree<u32, &str> = RbTree::new();
    let handle = index.insert(10, "ten");

    assert_eq!(index.len(), 1);
    assert_eq!(index.size(), 1);
    assert!(!index.is_empty());
    assert_eq!(index.first(), Some(handle));
    assert_eq!(index.last(), Some(handle));
    assert_eq!(index.begin(), index.rbegin());
    assert!(index.nodes[index.root.unwrap()].is_black());
    index.validate().unwrap();
}

#[test]
fn test_insert_sequential() {
    let mut index: RbTree<u32, u32> = RbTree::new();
    for key in 0..1000 {
        index.insert(key, key * 10);
        index.validate().unwrap();
    }
    for key in (1000..2000).rev() {
        index.insert(key, key * 10);
    }
    index.validate().unwrap();

    assert_eq!(index.len(), 2000);
    assert_eq!(keys(&index), (0..2000).collect::<Vec<u32>>());
    for key in 0..2000 {
        assert_eq!(index.find(&key).unwrap(), &(key * 10));
    }
}

#[test]
fn test_duplicate_keys() {
    let mut index: RbTree<u32, u32> = RbTree::new();
    let mut handles = vec![];
    for i in 0..10 {
        handles.push(index.insert(5, i));
        index.insert(3, i);
        index.insert(7, i);
    }
    index.validate().unwrap();
    assert_eq!(index.len(), 30);

    // every insert adds a node, none of them are replaced.
    let fives: Vec<u32> = index.iter().filter(|(k, _)| **k == 5).map(|(_, v)| *v).collect();
    assert_eq!(fives.len(), 10);

    // find returns the first of the equal keys in sorted order.
    let first = index.find_node(&5).unwrap();
    assert_eq!(index.key(first), Some(&5));
    assert_eq!(index.key(index.prev(first).unwrap()), Some(&3));
    assert_eq!(index.find_lower_bound_node(&5), Some(first));

    let upper = index.find_upper_bound_node(&5).unwrap();
    assert_eq!(index.key(upper), Some(&7));
    assert_eq!(index.key(index.prev(upper).unwrap()), Some(&5));

    // handles are distinct even when keys are equal.
    for (i, a) in handles.iter().enumerate() {
        for b in handles[i + 1..].iter() {
            assert_ne!(a, b);
        }
    }

    while let Some(handle) = index.find_node(&5) {
        index.delete(handle).unwrap();
        index.validate().unwrap();
    }
    assert_eq!(index.len(), 20);
    assert!(index.find(&5).is_err());
}

#[test]
fn test_find_not_found() {
    let mut index: RbTree<u32, u32> = RbTree::new();
    match index.find(&1) {
        Err(Error::KeyNotFound(_, _)) => (),
        res => panic!("unexpected {:?}", res),
    }

    index.insert(2, 20);
    assert!(index.find(&1).is_err());
    assert_eq!(index.get(&1), None);
    assert_eq!(index.get(&2), Some(&20));
    assert!(index.contains_key(&2));
    assert!(!index.contains_key(&3));
    assert_eq!(index.find_node(&3), None);
}

#[test]
fn test_bounds() {
    let mut index: RbTree<u32, ()> = RbTree::new();
    for key in [1, 3, 5, 7].iter() {
        index.insert(*key, ());
    }

    let lower = |key: u32| index.find_lower_bound_node(&key).map(|h| *index.key(h).unwrap());
    assert_eq!(lower(0), Some(1));
    assert_eq!(lower(2), Some(3));
    assert_eq!(lower(5), Some(5));
    assert_eq!(lower(7), Some(7));
    assert_eq!(lower(8), None);

    let upper = |key: u32| index.find_upper_bound_node(&key).map(|h| *index.key(h).unwrap());
    assert_eq!(upper(0), Some(1));
    assert_eq!(upper(1), Some(3));
    assert_eq!(upper(4), Some(5));
    assert_eq!(upper(6), Some(7));
    assert_eq!(upper(7), None);

    let empty: RbTree<u32, ()> = RbTree::new();
    assert_eq!(empty.find_lower_bound_node(&1), None);
    assert_eq!(empty.find_upper_bound_node(&1), None);
    assert_eq!(empty.first(), None);
    assert_eq!(empty.last(), None);
}

#[test]
fn test_delete_root_single() {
    let mut index: RbTree<u32, u32> = RbTree::new();
    let handle = index.insert(1, 10);
    assert_eq!(index.delete(handle), Some((1, 10)));

    assert!(index.root.is_none());
    assert_eq!(index.len(), 0);
    assert!(index.empty());
    assert_eq!(index.violation(), None);
    index.is_rb_tree().unwrap();
    index.validate().unwrap();

    // stale handle, delete is a no-op.
    assert_eq!(index.delete(handle), None);
    assert!(!index.contains(handle));
    assert_eq!(index.len(), 0);
}

#[test]
fn test_delete_two_children() {
    let mut index: RbTree<u32, &str> = RbTree::new();
    let h2 = index.insert(2, "two");
    let h1 = index.insert(1, "one");
    let h3 = index.insert(3, "three");
    assert_eq!(index.nodes.resolve(h2), index.root);

    // root has two children, successor 3 is unlinked and its entry
    // moves into the root node.
    assert_eq!(index.delete(h2), Some((2, "two")));
    index.validate().unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.key(h2), Some(&3));
    assert_eq!(index.value(h2), Some(&"three"));
    assert!(!index.contains(h3));
    assert_eq!(index.key(h1), Some(&1));
    assert_eq!(keys(&index), vec![1, 3]);
}

#[test]
fn test_delete_all_roundtrip() {
    let seed: u64 = random();
    println!("test_delete_all_roundtrip seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut items: Vec<u32> = (0..2000).collect();
    items.shuffle(&mut rng);

    let mut index: RbTree<u32, u32> = RbTree::new();
    for key in items.iter() {
        index.insert(*key, *key + 1);
    }
    index.validate().unwrap();

    items.shuffle(&mut rng);
    for (i, key) in items.iter().enumerate() {
        let handle = index.find_node(key).unwrap();
        assert_eq!(index.delete(handle), Some((*key, *key + 1)));
        assert_eq!(index.len(), items.len() - i - 1);
        if i % 100 == 0 {
            index.validate().unwrap();
        }
        assert_eq!(index.violation(), None);
    }

    assert!(index.is_empty());
    assert!(index.root.is_none());
    assert_eq!(index.first(), None);
    index.validate().unwrap();
}

#[test]
fn test_stress() {
    let seed: u64 = random();
    // let seed: u64 = 4979231427463125651;
    println!("test_stress seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbTree<u32, u64> = RbTree::new();
    let mut items: Vec<(u32, u64)> = vec![];
    for _i in 0..10_000 {
        let (key, val) = (rng.gen::<u32>() % 50_000, rng.gen::<u64>());
        index.insert(key, val);
        items.push((key, val));
    }
    index.validate().unwrap();
    assert_eq!(index.len(), 10_000);

    items.shuffle(&mut rng);
    let (deletes, survivors) = items.split_at(5_000);
    for (key, _) in deletes.iter() {
        let handle = index.find_node(key).unwrap();
        let (k, _) = index.delete(handle).unwrap();
        assert_eq!(k, *key);
        assert_eq!(index.violation(), None);
    }
    index.validate().unwrap();
    assert_eq!(index.len(), 5_000);

    // values of equal keys may come from either list, compare keys only.
    let mut expected: Vec<u32> = survivors.iter().map(|(k, _)| *k).collect();
    expected.sort_unstable();
    assert_eq!(keys(&index), expected);
}

#[test]
fn test_delete_at_cursor() {
    let seed: u64 = random();
    println!("test_delete_at_cursor seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbTree<u8, u64> = RbTree::new();
    let mut model: Vec<(u8, u64)> = vec![];

    // few distinct keys, so most deletes land on a duplicate.
    for val in 0..3000_u64 {
        if model.is_empty() || rng.gen::<u8>() % 3 != 0 {
            let key = rng.gen::<u8>() % 8;
            index.insert(key, val);
            model.push((key, val));
        } else {
            let pos = rng.gen_range(0..index.len());
            let mut cursor = index.iter_first();
            (0..pos).for_each(|_| cursor.move_next());
            let entry = (*cursor.key().unwrap(), *cursor.value().unwrap());
            let handle = cursor.handle().unwrap();

            assert_eq!(index.delete(handle), Some(entry), "at {}", pos);
            let off = model.iter().position(|item| *item == entry).unwrap();
            model.remove(off);
        }

        index.validate().unwrap();
        assert_eq!(index.len(), model.len());
        let items: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
        let mut expected = model.clone();
        expected.sort_unstable();
        assert_eq!(sorted(items), expected);
    }
}

#[test]
fn test_custom_cmp() {
    let mut index = RbTree::with_cmp(|a: &i64, b: &i64| b.cmp(a));
    for key in -50..50 {
        index.insert(key, ());
    }
    index.validate().unwrap();

    assert_eq!(keys(&index), (-50..50).rev().collect::<Vec<i64>>());
    assert_eq!(index.key(index.first().unwrap()), Some(&49));
    assert_eq!(index.compare(&1, &2), Ordering::Greater);
    assert!(index.cmp().compares_lt(&2, &1));

    // lower bound is "not less than" in the comparator's order.
    let h = index.find_lower_bound_node(&100).unwrap();
    assert_eq!(index.key(h), Some(&49));
    let h = index.find_upper_bound_node(&0).unwrap();
    assert_eq!(index.key(h), Some(&-1));
    assert_eq!(index.find_lower_bound_node(&-51), None);
}

#[test]
fn test_clear() {
    let mut index: RbTree<u32, u32> = RbTree::new();
    let handles: Vec<Handle> = (0..100).map(|i| index.insert(i, i)).collect();
    index.clear();

    assert_eq!(index.len(), 0);
    assert!(index.root.is_none());
    assert_eq!(index.iter().next(), None);
    for handle in handles.iter() {
        assert!(!index.contains(*handle));
        assert_eq!(index.delete(*handle), None);
    }

    // slots are reused, old handles must not resolve to new nodes.
    let handle = index.insert(1, 1);
    assert!(handles.iter().all(|h| *h != handle));
    assert!(handles.iter().all(|h| index.key(*h).is_none()));
    index.validate().unwrap();
}

#[test]
fn test_set_value() {
    let mut index: RbTree<u32, String> = RbTree::new();
    let handle = index.insert(1, "a".to_string());

    assert_eq!(index.set_value(handle, "b".to_string()), Some("a".to_string()));
    assert_eq!(index.find(&1).unwrap(), "b");
    index.value_mut(handle).unwrap().push('c');
    assert_eq!(index.value(handle).unwrap(), "bc");

    index.delete(handle);
    assert_eq!(index.set_value(handle, "d".to_string()), None);
    assert_eq!(index.value_mut(handle), None);
}

#[test]
fn test_remove() {
    let mut index: RbTree<u32, u32> = (0..10).map(|k| (k, k * 2)).collect();
    assert_eq!(index.remove(&4), Some(8));
    assert_eq!(index.remove(&4), None);
    assert_eq!(index.len(), 9);
    index.validate().unwrap();
}

#[test]
fn test_traversal() {
    let index: RbTree<u32, u32> = (0..10).rev().map(|k| (k, k)).collect();

    let mut seen = vec![];
    index.traversal(|k, _| {
        seen.push(*k);
        true
    });
    assert_eq!(seen, (0..10).collect::<Vec<u32>>());

    let mut seen = vec![];
    index.traversal(|k, _| {
        seen.push(*k);
        *k < 4
    });
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_rotate() {
    let mut index: RbTree<u32, ()> = (0..15).map(|k| (k, ())).collect();
    let before = keys(&index);

    let root = index.root.unwrap();
    index.rotate(root, Dir::Left);
    assert_ne!(index.root, Some(root));
    assert_eq!(index.nodes[index.root.unwrap()].left, Some(root));
    assert_eq!(keys(&index), before);

    let root = index.root.unwrap();
    index.rotate(root, Dir::Right);
    assert_eq!(keys(&index), before);

    // rotations never touch colors, only links.
    let colors: Vec<Color> = before
        .iter()
        .map(|k| {
            let h = index.find_node(k).unwrap();
            index.nodes[index.nodes.resolve(h).unwrap()].color
        })
        .collect();
    let inner = index.nodes[index.root.unwrap()].left.unwrap();
    index.rotate(inner, Dir::Right);
    let after: Vec<Color> = before
        .iter()
        .map(|k| {
            let h = index.find_node(k).unwrap();
            index.nodes[index.nodes.resolve(h).unwrap()].color
        })
        .collect();
    assert_eq!(colors, after);
    assert_eq!(keys(&index), before);
}

#[test]
fn test_debug() {
    let index: RbTree<u32, &str> = vec![(2, "b"), (1, "a")].into_iter().collect();
    assert_eq!(format!("{:?}", index), r#"{1: "a", 2: "b"}"#);
}

#[test]
fn test_rbtree() {
    let seed: u64 = random();
    // let seed: u64 = 8340812447139372826;
    println!("test_rbtree seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut index: RbTree<u8, u64> = RbTree::new();
    let mut btmap: BTreeMap<u8, Vec<u64>> = BTreeMap::new();

    let mut counts = [0_usize; 11];

    for _i in 0..50_000 {
        let bytes = rng.gen::<[u8; 32]>();
        let mut uns = Unstructured::new(&bytes);

        let op: Op<u8, u64> = uns.arbitrary().unwrap();
        // println!("op -- {:?}", op);
        match op {
            Op::Len => {
                counts[0] += 1;
                assert_eq!(index.len(), btmap.values().map(Vec::len).sum::<usize>());
            }
            Op::IsEmpty => {
                counts[1] += 1;
                assert_eq!(index.is_empty(), btmap.is_empty());
            }
            Op::Insert(key, val) => {
                counts[2] += 1;
                let handle = index.insert(key, val);
                assert_eq!(index.value(handle), Some(&val));
                btmap.entry(key).or_insert_with(Vec::new).push(val);
            }
            Op::Delete(key) => {
                counts[3] += 1;
                match (index.find_node(&key), btmap.get_mut(&key)) {
                    (None, None) => (),
                    (Some(handle), Some(values)) => {
                        let (k, v) = index.delete(handle).unwrap();
                        assert_eq!(k, key);
                        let off = values.iter().position(|x| *x == v).unwrap();
                        values.remove(off);
                        if values.is_empty() {
                            btmap.remove(&key);
                        }
                    }
                    (None, Some(_)) => panic!("delete no key {} in rbtree", key),
                    (Some(_), None) => panic!("delete no key {} in btree", key),
                }
            }
            Op::Validate => {
                counts[4] += 1;
                index.validate().unwrap();
            }
            Op::Find(key) => {
                counts[5] += 1;
                match (index.find(&key).ok(), btmap.get(&key)) {
                    (None, None) => (),
                    (Some(v), Some(values)) => assert!(values.contains(v), "for key {}", key),
                    (None, Some(_)) => panic!("find no key {} in rbtree", key),
                    (Some(_), None) => panic!("find no key {} in btree", key),
                }
            }
            Op::LowerBound(key) => {
                counts[6] += 1;
                let handle = index.find_lower_bound_node(&key);
                let a = handle.map(|h| *index.key(h).unwrap());
                let b = btmap.range(key..).next().map(|(k, _)| *k);
                assert_eq!(a, b, "lower bound {}", key);
                if let Some(prev) = handle.and_then(|h| index.prev(h)) {
                    assert!(*index.key(prev).unwrap() < key);
                }
            }
            Op::UpperBound(key) => {
                counts[7] += 1;
                let handle = index.find_upper_bound_node(&key);
                let a = handle.map(|h| *index.key(h).unwrap());
                let b = btmap.range((Excluded(key), Unbounded)).next().map(|(k, _)| *k);
                assert_eq!(a, b, "upper bound {}", key);
                if let Some(prev) = handle.and_then(|h| index.prev(h)) {
                    assert!(*index.key(prev).unwrap() <= key);
                }
            }
            Op::Iter => {
                counts[8] += 1;
                let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(sorted(a), flatten(&btmap));
            }
            Op::Reverse => {
                counts[9] += 1;
                let mut a: Vec<(u8, u64)> = index.iter().rev().map(|(k, v)| (*k, *v)).collect();
                a.reverse();
                assert_eq!(sorted(a), flatten(&btmap));
            }
            Op::Extend(items) => {
                counts[10] += 1;
                let items: Vec<(u8, u64)> = items.into_iter().take(4).collect();
                index.extend(items.clone());
                for (key, val) in items.into_iter() {
                    btmap.entry(key).or_insert_with(Vec::new).push(val);
                }
            }
        }
    }

    index.validate().unwrap();
    let a: Vec<(u8, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(sorted(a), flatten(&btmap));

    println!("counts {:?} len:{}", counts, index.len());
}

// sort values among equal keys, after checking keys are in order.
fn sorted(mut items: Vec<(u8, u64)>) -> Vec<(u8, u64)> {
    assert!(items.windows(2).all(|w| w[0].0 <= w[1].0));
    items.sort_unstable();
    items
}

fn flatten(btmap: &BTreeMap<u8, Vec<u64>>) -> Vec<(u8, u64)> {
    let mut items: Vec<(u8, u64)> = btmap
        .iter()
        .flat_map(|(k, vs)| vs.iter().map(move |v| (*k, *v)))
        .collect();
    items.sort_unstable();
    items
}

#[derive(Debug, Arbitrary)]
enum Op<K, V> {
    Len,
    IsEmpty,
    Insert(K, V),
    Delete(K),
    Validate,
    Find(K),
    LowerBound(K),
    UpperBound(K),
    Iter,
    Reverse,
    Extend(Vec<(K, V)>),
}
