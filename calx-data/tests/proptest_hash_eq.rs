// calx-data - Property-based tests for Hash/Eq consistency
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Property-based tests for Hash/Eq consistency.
//!
//! Tests the fundamental hash contract: if a == b, then hash(a) == hash(b),
//! regardless of insertion order or storage representation.

mod common;

use common::*;
use proptest::prelude::*;
use std::cmp::Ordering;

// =============================================================================
// Scalars
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Equal numbers should have equal hashes
    #[test]
    fn number_hash_eq_consistency(n in any::<f64>().prop_filter("not nan", |f| !f.is_nan())) {
        assert_hash_eq_consistent(&num(n), &num(n), "same number");
    }

    /// Strings and tags with the same text are different values
    #[test]
    fn string_tag_distinct(s in "[a-z]{1,8}") {
        let string = Value::string(s.as_str());
        let tag = Value::tag(&s);
        prop_assert_ne!(&string, &tag);
        prop_assert_ne!(hash_value(&string), hash_value(&tag));
    }
}

// =============================================================================
// Collections
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Slice-backed and tree-backed lists with the same elements are equal
    #[test]
    fn list_representation_invisible(items in prop::collection::vec(scalar(), 0..40)) {
        let (slice, tree) = both_list_modes(items);
        prop_assert!(tree.is_tree());
        assert_hash_eq_consistent(&Value::List(slice), &Value::List(tree), "list modes");
    }

    /// Maps built from the same pairs in any order are equal
    #[test]
    fn map_insertion_order_irrelevant(keys in prop::collection::hash_set(-500i64..500, 0..40)) {
        let pairs: Vec<(Value, Value)> = keys
            .iter()
            .map(|k| (num(*k as f64), Value::string(k.to_string())))
            .collect();
        let mut reversed = pairs.clone();
        reversed.reverse();
        assert_hash_eq_consistent(&Value::map(pairs), &Value::map(reversed), "map order");
    }

    /// A map grown by assoc equals one built at once
    #[test]
    fn map_assoc_matches_from_pairs(keys in prop::collection::vec(-50i64..50, 0..40)) {
        let built = keys.iter().fold(Map::new(), |m, k| m.assoc(num(*k as f64), num(1.0)));
        let direct = Map::from_pairs(keys.iter().map(|k| (num(*k as f64), num(1.0))).collect());
        assert_hash_eq_consistent(&Value::Map(built), &Value::Map(direct), "map assoc");
    }

    /// Merged maps equal their eager equivalent, chained or not
    #[test]
    fn map_merge_matches_assoc(
        left in prop::collection::vec((-30i64..30, -5i64..5), 0..30),
        right in prop::collection::vec((-30i64..30, -5i64..5), 0..30),
    ) {
        let to_map = |pairs: &[(i64, i64)]| {
            Map::from_pairs(pairs.iter().map(|(k, v)| (num(*k as f64), num(*v as f64))).collect())
        };
        let (a, b) = (to_map(&left), to_map(&right));
        let merged = a.merge(&b);
        let eager = b.iter().fold(a.clone(), |m, (k, v)| m.assoc(k.clone(), v.clone()));
        assert_hash_eq_consistent(&Value::Map(merged), &Value::Map(eager), "merge");
    }

    /// Sets built from shuffled duplicates are equal
    #[test]
    fn set_order_and_duplicates_irrelevant(items in prop::collection::vec(-20i64..20, 0..40)) {
        let values: Vec<Value> = items.iter().map(|n| num(*n as f64)).collect();
        let mut doubled = values.clone();
        doubled.extend(values.iter().rev().cloned());
        assert_hash_eq_consistent(&Value::set(values), &Value::set(doubled), "set");
    }

    /// Equal nested values have equal hashes and compare Equal
    #[test]
    fn nested_clone_consistency(v in nested_value()) {
        let copy = v.clone();
        assert_hash_eq_consistent(&v, &copy, "clone");
        prop_assert_eq!(v.cmp(&copy), Ordering::Equal);
    }

    /// Equality agrees with the total order
    #[test]
    fn order_agrees_with_equality(a in nested_value(), b in nested_value()) {
        prop_assert_eq!(a == b, a.cmp(&b) == Ordering::Equal);
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        if a == b {
            prop_assert_eq!(hash_value(&a), hash_value(&b));
        }
    }
}
