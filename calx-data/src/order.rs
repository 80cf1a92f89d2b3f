// calx-data - Total ordering over values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Total, deterministic order over all values.
//!
//! Values of different variants order by a fixed rank. Within a variant the
//! order is structural. Map and set contents are compared after sorting, so
//! the order never depends on storage representation. This order is what
//! makes encoded output canonical.

use std::cmp::Ordering;

use crate::list::List;
use crate::map::Map;
use crate::record::Record;
use crate::set::Set;
use crate::tuple::Tuple;
use crate::value::Value;

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Nil => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::Symbol(_) => 3,
        Value::Tag(_) => 4,
        Value::Str(_) => 5,
        Value::CirruQuote(_) => 6,
        Value::Ref(_) => 7,
        Value::Tuple(_) => 8,
        Value::Recur(_) => 9,
        Value::List(_) => 10,
        Value::Set(_) => 11,
        Value::Map(_) => 12,
        Value::Record(_) => 13,
        Value::Fn(_) => 14,
    }
}

/// Compare two values under the total order.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Nil, Value::Nil) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            if x == y {
                Ordering::Equal
            } else {
                x.total_cmp(y)
            }
        }
        (Value::Symbol(x), Value::Symbol(y)) => x.cmp(y),
        (Value::Tag(x), Value::Tag(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::CirruQuote(x), Value::CirruQuote(y)) => x.cmp(y),
        (Value::Ref(x), Value::Ref(y)) => x.path().cmp(y.path()),
        (Value::Tuple(x), Value::Tuple(y)) => compare_tuples(x, y),
        (Value::Recur(x), Value::Recur(y)) => x.iter().cmp(y.iter()),
        (Value::List(x), Value::List(y)) => compare_lists(x, y),
        (Value::Set(x), Value::Set(y)) => compare_sets(x, y),
        (Value::Map(x), Value::Map(y)) => compare_maps(x, y),
        (Value::Record(x), Value::Record(y)) => compare_records(x, y),
        (Value::Fn(x), Value::Fn(y)) => x.identity().cmp(&y.identity()),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn compare_lists(a: &List, b: &List) -> Ordering {
    if a.ptr_eq(b) {
        return Ordering::Equal;
    }
    a.iter().cmp(b.iter())
}

fn compare_tuples(a: &Tuple, b: &Tuple) -> Ordering {
    compare(a.tag(), b.tag()).then_with(|| a.extra().iter().cmp(b.extra().iter()))
}

fn compare_sets(a: &Set, b: &Set) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        let mut xs: Vec<&Value> = a.iter().collect();
        let mut ys: Vec<&Value> = b.iter().collect();
        xs.sort();
        ys.sort();
        xs.cmp(&ys)
    })
}

/// Map entries sorted by key, then value.
pub(crate) fn sorted_entries(m: &Map) -> Vec<(&Value, &Value)> {
    let mut entries: Vec<(&Value, &Value)> = m.iter().collect();
    entries.sort();
    entries
}

fn compare_maps(a: &Map, b: &Map) -> Ordering {
    if a.ptr_eq(b) {
        return Ordering::Equal;
    }
    a.len()
        .cmp(&b.len())
        .then_with(|| sorted_entries(a).cmp(&sorted_entries(b)))
}

fn compare_records(a: &Record, b: &Record) -> Ordering {
    a.name()
        .cmp(b.name())
        .then_with(|| a.fields().cmp(b.fields()))
        .then_with(|| a.values().iter().cmp(b.values().iter()))
}

/// Whether a value is a scalar that prints as a single leaf.
///
/// Used to lay out encoded records and maps with short entries first.
pub fn is_literal(v: &Value) -> bool {
    matches!(
        v,
        Value::Nil
            | Value::Bool(_)
            | Value::Number(_)
            | Value::Str(_)
            | Value::Tag(_)
            | Value::Symbol(_)
    )
}
