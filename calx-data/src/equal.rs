// calx-data - Structural equality
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Structural equality over values.
//!
//! Equality never depends on storage representation: a slice-backed list
//! equals a tree-backed list with the same elements, and a layered map equals
//! its squashed form. Functions compare by identity, refs by path. Recur
//! markers are never equal to anything.

use tracing::warn;

use crate::list::List;
use crate::map::Map;
use crate::record::Record;
use crate::set::Set;
use crate::tuple::Tuple;
use crate::value::Value;

/// Structural equality. Backs `PartialEq for Value`.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::Tag(x), Value::Tag(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x == y,
        (Value::Ref(x), Value::Ref(y)) => x.path() == y.path(),
        (Value::Fn(x), Value::Fn(y)) => x.ptr_eq(y),
        (Value::Recur(_), _) | (_, Value::Recur(_)) => {
            warn!(left = %a, right = %b, "comparing recur marker, treating as unequal");
            false
        }
        (Value::List(x), Value::List(y)) => lists_equal(x, y),
        (Value::Map(x), Value::Map(y)) => maps_equal(x, y),
        (Value::Set(x), Value::Set(y)) => sets_equal(x, y),
        (Value::Record(x), Value::Record(y)) => records_equal(x, y),
        (Value::Tuple(x), Value::Tuple(y)) => tuples_equal(x, y),
        (Value::CirruQuote(x), Value::CirruQuote(y)) => x == y,
        _ => false,
    }
}

/// Two cached hashes that differ prove inequality.
fn hashes_differ(a: Option<u64>, b: Option<u64>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x != y)
}

fn lists_equal(a: &List, b: &List) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    if a.len() != b.len() || hashes_differ(a.peek_hash(), b.peek_hash()) {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| values_equal(&x, &y))
}

fn maps_equal(a: &Map, b: &Map) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    if a.len() != b.len() || hashes_differ(a.peek_hash(), b.peek_hash()) {
        return false;
    }
    a.iter()
        .all(|(k, v)| b.get(k).is_some_and(|other| values_equal(v, &other)))
}

// Pairwise so that elements whose hashes collide are still told apart.
fn sets_equal(a: &Set, b: &Set) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    if a.len() != b.len() || hashes_differ(a.peek_hash(), b.peek_hash()) {
        return false;
    }
    a.iter().all(|x| b.iter().any(|y| values_equal(x, y)))
}

fn records_equal(a: &Record, b: &Record) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    a.name() == b.name()
        && a.fields() == b.fields()
        && a.values()
            .iter()
            .zip(b.values())
            .all(|(x, y)| values_equal(x, y))
}

fn tuples_equal(a: &Tuple, b: &Tuple) -> bool {
    if a.ptr_eq(b) {
        return true;
    }
    values_equal(a.tag(), b.tag())
        && a.extra().len() == b.extra().len()
        && a.extra()
            .iter()
            .zip(b.extra())
            .all(|(x, y)| values_equal(x, y))
}
