// calx-data - Collection integration tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistence and sharing behaviour of lists, maps, sets, records and
//! tuples.

mod common;

use std::sync::Arc;

use calx_data::{CHAIN_DEPTH_LIMIT, MAP_SLICE_LIMIT};
use common::*;

// =============================================================================
// Lists
// =============================================================================

#[test]
fn test_append_chain_keeps_every_version() {
    let mut versions = vec![List::new()];
    for i in 0..100 {
        let next = versions[i].append(num(i as f64));
        versions.push(next);
    }
    for (i, version) in versions.iter().enumerate() {
        assert_eq!(version.len(), i);
        if i > 0 {
            assert_eq!(version.get(i - 1), Some(num((i - 1) as f64)));
        }
    }
}

#[test]
fn test_update_leaves_original_untouched() {
    let original = List::from_vec(nums(&[1.0, 2.0, 3.0]));
    let _ = original.assoc(0, num(9.0)).unwrap();
    let _ = original.dissoc(1).unwrap();
    let _ = original.prepend(num(0.0));
    let _ = original.reverse();
    assert_eq!(original.to_vec(), nums(&[1.0, 2.0, 3.0]));
}

#[test]
fn test_list_index_errors() {
    let list = List::from_vec(nums(&[1.0]));
    assert!(matches!(list.nth(1), Err(Error::IndexError { index: 1, len: 1, .. })));
    assert!(matches!(list.assoc_before(1, num(0.0)), Err(Error::IndexError { .. })));
    assert!(matches!(list.slice(0, 2), Err(Error::IndexError { .. })));
}

#[test]
fn test_lists_concurrent_appends() {
    let base = List::from_vec(nums(&[0.0]));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let base = base.clone();
            std::thread::spawn(move || base.append(num(i as f64)))
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let list = handle.join().unwrap();
        assert_eq!(list.to_vec(), nums(&[0.0, i as f64]));
    }
    assert_eq!(base.len(), 1);
}

// =============================================================================
// Maps
// =============================================================================

#[test]
fn test_map_crosses_slice_limit_and_back() {
    let mut m = Map::new();
    for i in 0..(MAP_SLICE_LIMIT * 2) {
        m = m.assoc(num(i as f64), num(i as f64));
    }
    assert_eq!(m.len(), MAP_SLICE_LIMIT * 2);
    for i in 0..(MAP_SLICE_LIMIT * 2) {
        assert_eq!(m.get(&num(i as f64)), Some(num(i as f64)));
    }
}

#[test]
fn test_deep_merge_chain() {
    let mut m = Map::from_pairs((0..20).map(|i| (num(i as f64), num(0.0))).collect());
    for layer in 1..=(CHAIN_DEPTH_LIMIT * 3) {
        let over: Vec<(Value, Value)> = (0..20)
            .map(|i| (num((layer * 10 + i) as f64), num(layer as f64)))
            .collect();
        m = m.merge(&Map::from_pairs(over));
    }
    assert_eq!(m.get(&num(0.0)), Some(num(0.0)));
    let last = (CHAIN_DEPTH_LIMIT * 3) as f64;
    assert_eq!(m.get(&num(last * 10.0 + 19.0)), Some(num(last)));
    assert_eq!(m.len(), 20 + CHAIN_DEPTH_LIMIT * 3 * 10);
}

#[test]
fn test_map_keys_and_pairs() {
    let m = Map::from_pairs(vec![
        (Value::tag("a"), num(1.0)),
        (Value::tag("b"), num(2.0)),
    ]);
    let mut keys = m.keys();
    keys.sort();
    assert_eq!(keys, vec![Value::tag("a"), Value::tag("b")]);
    assert_eq!(m.to_pairs().len(), 2);
    assert_eq!(m.get_strict(&Value::tag("a")).unwrap(), num(1.0));
}

// =============================================================================
// Sets
// =============================================================================

#[test]
fn test_set_dedup() {
    let s = Set::from_values(nums(&[1.0, 1.0, 2.0]));
    assert_eq!(s.len(), 2);
}

#[test]
fn test_set_of_collections() {
    let (slice, tree) = both_list_modes(nums(&[1.0, 2.0]));
    let s = Set::from_values(vec![Value::List(slice), Value::List(tree)]);
    assert_eq!(s.len(), 1);
}

// =============================================================================
// Records and tuples
// =============================================================================

fn point(x: f64, y: f64) -> Record {
    Record::new(
        Tag::new("point"),
        vec![(Tag::new("x"), num(x)), (Tag::new("y"), num(y))],
    )
    .unwrap()
}

#[test]
fn test_record_assoc_shares_schema() {
    let p = point(1.0, 2.0);
    let q = p.assoc(&Tag::new("x"), num(10.0)).unwrap();
    assert!(Arc::ptr_eq(p.fields(), q.fields()));
    assert_eq!(p.get(&Tag::new("x")).unwrap(), num(1.0));
}

#[test]
fn test_record_unknown_field() {
    let err = point(1.0, 2.0).assoc(&Tag::new("z"), num(0.0)).unwrap_err();
    let msg = err.to_string();
    assert!(matches!(err, Error::UnknownField { .. }));
    assert!(msg.contains(":z"));
    assert!(msg.contains(":x :y"));
}

#[test]
fn test_record_as_map_key() {
    let m = Map::new()
        .assoc(Value::Record(point(1.0, 2.0)), Value::string("origin-ish"))
        .assoc(Value::Record(point(1.0, 2.0)), Value::string("replaced"));
    assert_eq!(m.len(), 1);
    assert_eq!(
        m.get(&Value::Record(point(1.0, 2.0))),
        Some(Value::string("replaced"))
    );
}

#[test]
fn test_tuple_assoc_out_of_range() {
    let t = Tuple::new(Value::tag("pair"), nums(&[1.0, 2.0]));
    assert!(matches!(t.assoc(3, Value::Nil), Err(Error::IndexError { .. })));
    assert_eq!(t.assoc(2, Value::Nil).unwrap().get(2).unwrap(), Value::Nil);
}

#[test]
fn test_values_usable_across_threads() {
    let shared = Value::map(vec![(Value::tag("k"), Value::list(nums(&[1.0, 2.0])))]);
    let handle = {
        let shared = shared.clone();
        std::thread::spawn(move || hash_value(&shared))
    };
    assert_eq!(handle.join().unwrap(), hash_value(&shared));
}
