// calx-data - Structural hashing
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Structural hash over values.
//!
//! Every variant folds its content into a distinct per-variant seed, so a
//! list and a tuple with the same children never collide by construction.
//! Ordered collections fold children in sequence. Map and set children are
//! first sorted by the total value order so that insertion order and storage
//! representation do not affect the result. Composite hashes are cached on the
//! node after the first request.
//!
//! Hashes are deterministic within one process. They are not a persisted
//! format.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::cirru::Cirru;
use crate::map::Map;
use crate::set::Set;
use crate::value::Value;

// ============================================================================
// Seeds
// ============================================================================

/// FNV-1a over a label, evaluated at compile time.
const fn seed(label: &str) -> u64 {
    let bytes = label.as_bytes();
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    let mut i = 0;
    while i < bytes.len() {
        h ^= bytes[i] as u64;
        h = h.wrapping_mul(0x0100_0000_01b3);
        i += 1;
    }
    h
}

pub(crate) const NIL_SEED: u64 = seed("nil:");
pub(crate) const TRUE_SEED: u64 = seed("bool:true");
pub(crate) const FALSE_SEED: u64 = seed("bool:false");
pub(crate) const NUMBER_SEED: u64 = seed("number:");
pub(crate) const STRING_SEED: u64 = seed("string:");
pub(crate) const TAG_SEED: u64 = seed("tag:");
pub(crate) const SYMBOL_SEED: u64 = seed("symbol:");
pub(crate) const REF_SEED: u64 = seed("ref:");
pub(crate) const FN_SEED: u64 = seed("fn:");
pub(crate) const RECUR_SEED: u64 = seed("recur:");
pub(crate) const LIST_SEED: u64 = seed("list:");
pub(crate) const MAP_SEED: u64 = seed("map:");
pub(crate) const SET_SEED: u64 = seed("set:");
pub(crate) const RECORD_SEED: u64 = seed("record:");
pub(crate) const TUPLE_SEED: u64 = seed("tuple:");
pub(crate) const QUOTE_SEED: u64 = seed("quote:");
const CIRRU_LEAF_SEED: u64 = seed("cirru-leaf:");
const CIRRU_LIST_SEED: u64 = seed("cirru-list:");

/// Fold `x` into an accumulated hash.
#[inline]
pub(crate) fn mix<T: Hash + ?Sized>(base: u64, x: &T) -> u64 {
    let mut h = DefaultHasher::new();
    base.hash(&mut h);
    x.hash(&mut h);
    h.finish()
}

/// Identity counter for values that hash by identity (functions).
static IDENTITY_COUNTER: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_identity() -> u64 {
    IDENTITY_COUNTER.fetch_add(1, AtomicOrdering::Relaxed)
}

// ============================================================================
// Value hashing
// ============================================================================

/// Structural hash of a value.
///
/// Values that compare equal hash equal. Composite nodes cache the result.
pub fn hash_value(v: &Value) -> u64 {
    match v {
        Value::Nil => NIL_SEED,
        Value::Bool(true) => TRUE_SEED,
        Value::Bool(false) => FALSE_SEED,
        Value::Number(n) => hash_number(*n),
        Value::Str(s) => mix(STRING_SEED, &**s),
        Value::Tag(t) => t.cached_hash(),
        Value::Symbol(s) => mix(SYMBOL_SEED, s.name()),
        Value::Ref(r) => mix(REF_SEED, r.path()),
        Value::Fn(f) => f.cached_hash(),
        Value::Recur(args) => hash_ordered(RECUR_SEED, args.iter()),
        Value::List(l) => l.cached_hash(),
        Value::Map(m) => m.cached_hash(),
        Value::Set(s) => s.cached_hash(),
        Value::Record(r) => r.cached_hash(),
        Value::Tuple(t) => t.cached_hash(),
        Value::CirruQuote(c) => mix(QUOTE_SEED, &hash_cirru(c)),
    }
}

fn hash_number(n: f64) -> u64 {
    // -0.0 == 0.0, so both must land on the same bits
    let n = if n == 0.0 { 0.0 } else { n };
    mix(NUMBER_SEED, &n.to_bits())
}

pub(crate) fn hash_ordered<'a>(seed: u64, items: impl Iterator<Item = &'a Value>) -> u64 {
    items.fold(seed, |acc, item| mix(acc, &hash_value(item)))
}

pub(crate) fn hash_cirru(c: &Cirru) -> u64 {
    match c {
        Cirru::Leaf(s) => mix(CIRRU_LEAF_SEED, &**s),
        Cirru::List(items) => items
            .iter()
            .fold(CIRRU_LIST_SEED, |acc, item| mix(acc, &hash_cirru(item))),
    }
}

/// Hash a map's entries independently of their storage order.
pub(crate) fn hash_map_entries(m: &Map) -> u64 {
    let mut entries: Vec<(&Value, &Value)> = m.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.cmp(b.1)));
    entries.into_iter().fold(MAP_SEED, |acc, (k, v)| {
        mix(mix(acc, &hash_value(k)), &hash_value(v))
    })
}

pub(crate) fn hash_set_elements(s: &Set) -> u64 {
    let mut items: Vec<&Value> = s.iter().collect();
    items.sort();
    hash_ordered(SET_SEED, items.into_iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeds_distinct() {
        let seeds = [
            NIL_SEED,
            TRUE_SEED,
            FALSE_SEED,
            NUMBER_SEED,
            STRING_SEED,
            TAG_SEED,
            SYMBOL_SEED,
            REF_SEED,
            FN_SEED,
            RECUR_SEED,
            LIST_SEED,
            MAP_SEED,
            SET_SEED,
            RECORD_SEED,
            TUPLE_SEED,
            QUOTE_SEED,
        ];
        for (i, a) in seeds.iter().enumerate() {
            for b in &seeds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(
            hash_value(&Value::Number(0.0)),
            hash_value(&Value::Number(-0.0))
        );
    }

    #[test]
    fn test_string_vs_tag() {
        assert_ne!(hash_value(&Value::string("a")), hash_value(&Value::tag("a")));
    }

    #[test]
    fn test_cirru_structure() {
        let a = Cirru::list(vec!["a".into(), "b".into()]);
        let b = Cirru::list(vec![Cirru::list(vec!["a".into(), "b".into()])]);
        assert_ne!(hash_cirru(&a), hash_cirru(&b));
        assert_eq!(hash_cirru(&a), hash_cirru(&a.clone()));
    }
}
