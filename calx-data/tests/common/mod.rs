// calx-data - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for calx-data integration tests.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[allow(unused_imports)]
pub use calx_data::{Error, List, Map, Record, Set, Tag, Tuple, Value, hash_value};
use proptest::prelude::*;

pub fn num(n: f64) -> Value {
    Value::number(n)
}

pub fn nums(xs: &[f64]) -> Vec<Value> {
    xs.iter().map(|n| num(*n)).collect()
}

/// Hash a value through `std::hash::Hash`, the way hash maps see it.
pub fn std_hash(val: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    val.hash(&mut hasher);
    hasher.finish()
}

/// Assert that two values are equal and have equal hashes.
pub fn assert_hash_eq_consistent(v1: &Value, v2: &Value, msg: &str) {
    assert_eq!(v1, v2, "{} - values should be equal", msg);
    assert_eq!(
        hash_value(v1),
        hash_value(v2),
        "{} - structural hashes should be equal",
        msg
    );
    assert_eq!(std_hash(v1), std_hash(v2), "{} - hashes should be equal", msg);
}

/// Build a slice-mode list and a tree-mode list with the same elements.
pub fn both_list_modes(items: Vec<Value>) -> (List, List) {
    let slice = List::from_vec(items.clone());
    let mut reversed = items;
    reversed.reverse();
    let tree = List::from_vec(reversed).reverse();
    (slice, tree)
}

/// Strategy for scalar values that are safe to compare (no NaN).
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(|n| Value::number(n as f64)),
        (-1.0e6f64..1.0e6).prop_map(Value::number),
        "[a-z]{0,6}".prop_map(|s| Value::string(s.as_str())),
        "[a-z]{1,6}".prop_map(|s| Value::tag(&s)),
        "[a-z]{1,6}".prop_map(|s| Value::symbol(&s)),
    ]
}

/// Strategy for nested values built from lists, maps, sets and tuples.
pub fn nested_value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::list),
            prop::collection::vec((inner.clone(), inner.clone()), 0..6).prop_map(Value::map),
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::set),
            (inner.clone(), prop::collection::vec(inner, 0..3))
                .prop_map(|(tag, extra)| Value::tuple(tag, extra)),
        ]
    })
}
