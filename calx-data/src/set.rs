// calx-data - Persistent set
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistent set, stored as a [`Map`] from element to a marker value.
//!
//! Membership and deduplication use structural equality, so elements that
//! collide in hash but differ structurally are kept apart.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::hash::hash_set_elements;
use crate::map::Map;
use crate::value::Value;

const MARKER: Value = Value::Nil;

/// An immutable set of values.
#[derive(Clone)]
pub struct Set(Arc<SetNode>);

struct SetNode {
    entries: Map,
    hash: OnceLock<u64>,
}

impl Set {
    pub fn new() -> Self {
        Set::from_map(Map::new())
    }

    /// Build a set, dropping structurally equal duplicates.
    pub fn from_values(values: Vec<Value>) -> Self {
        let mut entries = Map::new();
        for value in values {
            if !entries.contains(&value) {
                entries = entries.assoc(value, MARKER);
            }
        }
        Set::from_map(entries)
    }

    fn from_map(entries: Map) -> Self {
        Set(Arc::new(SetNode {
            entries,
            hash: OnceLock::new(),
        }))
    }

    pub fn len(&self) -> usize {
        self.0.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Set) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.0.entries.contains(value)
    }

    /// Return a set with `value` added.
    pub fn include(&self, value: Value) -> Set {
        if self.contains(&value) {
            return self.clone();
        }
        Set::from_map(self.0.entries.assoc(value, MARKER))
    }

    /// Return a set with `value` removed.
    pub fn exclude(&self, value: &Value) -> Set {
        if !self.contains(value) {
            return self.clone();
        }
        Set::from_map(self.0.entries.dissoc(value))
    }

    pub fn union(&self, other: &Set) -> Set {
        other.iter().fold(self.clone(), |acc, v| acc.include(v.clone()))
    }

    pub fn intersection(&self, other: &Set) -> Set {
        Set::from_values(self.iter().filter(|v| other.contains(v)).cloned().collect())
    }

    /// Elements of `self` absent from `other`.
    pub fn difference(&self, other: &Set) -> Set {
        Set::from_values(self.iter().filter(|v| !other.contains(v)).cloned().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.entries.iter().map(|(k, _)| k)
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().cloned().collect()
    }

    /// Smallest element under the total order, if any.
    pub fn first(&self) -> Option<Value> {
        self.iter().min().cloned()
    }

    /// The set without [`first`](Self::first).
    pub fn rest(&self) -> Set {
        match self.first() {
            Some(head) => self.exclude(&head),
            None => self.clone(),
        }
    }

    pub(crate) fn cached_hash(&self) -> u64 {
        *self.0.hash.get_or_init(|| hash_set_elements(self))
    }

    pub(crate) fn peek_hash(&self) -> Option<u64> {
        self.0.hash.get().copied()
    }
}

impl Default for Set {
    fn default() -> Self {
        Set::new()
    }
}

impl FromIterator<Value> for Set {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Set::from_values(iter.into_iter().collect())
    }
}

impl fmt::Debug for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
