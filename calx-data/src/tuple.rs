// calx-data - Tuples
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tagged tuples: a head value, extra values, and an optional list of
//! implementation records for method dispatch.
//!
//! Position 0 is the tag; positions 1.. are the extra values.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};
use crate::hash::{TUPLE_SEED, hash_value, mix};
use crate::record::Record;
use crate::value::Value;

/// A tagged tuple.
#[derive(Clone)]
pub struct Tuple(Arc<TupleNode>);

struct TupleNode {
    tag: Value,
    extra: Vec<Value>,
    impls: Arc<[Record]>,
    hash: OnceLock<u64>,
}

impl Tuple {
    pub fn new(tag: Value, extra: Vec<Value>) -> Self {
        Tuple::with_impls(tag, extra, Vec::new())
    }

    pub fn with_impls(tag: Value, extra: Vec<Value>, impls: Vec<Record>) -> Self {
        Tuple::from_parts(tag, extra, impls.into())
    }

    fn from_parts(tag: Value, extra: Vec<Value>, impls: Arc<[Record]>) -> Self {
        Tuple(Arc::new(TupleNode {
            tag,
            extra,
            impls,
            hash: OnceLock::new(),
        }))
    }

    #[inline]
    pub fn tag(&self) -> &Value {
        &self.0.tag
    }

    #[inline]
    pub fn extra(&self) -> &[Value] {
        &self.0.extra
    }

    #[inline]
    pub fn impls(&self) -> &[Record] {
        &self.0.impls
    }

    /// Tag plus extra values.
    pub fn len(&self) -> usize {
        self.0.extra.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Tuple) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Element at `idx`, where 0 is the tag.
    pub fn get(&self, idx: usize) -> Result<Value> {
        match idx {
            0 => Ok(self.0.tag.clone()),
            n => self
                .0
                .extra
                .get(n - 1)
                .cloned()
                .ok_or_else(|| Error::index("tuple get", idx, self.len())),
        }
    }

    /// Replace the element at `idx`, keeping the implementations.
    pub fn assoc(&self, idx: usize, value: Value) -> Result<Tuple> {
        if idx >= self.len() {
            return Err(Error::index("tuple assoc", idx, self.len()));
        }
        let (tag, extra) = if idx == 0 {
            (value, self.0.extra.clone())
        } else {
            let mut extra = self.0.extra.clone();
            extra[idx - 1] = value;
            (self.0.tag.clone(), extra)
        };
        Ok(Tuple::from_parts(tag, extra, Arc::clone(&self.0.impls)))
    }

    pub(crate) fn cached_hash(&self) -> u64 {
        *self.0.hash.get_or_init(|| {
            self.0
                .extra
                .iter()
                .fold(mix(TUPLE_SEED, &hash_value(&self.0.tag)), |acc, v| {
                    mix(acc, &hash_value(v))
                })
        })
    }
}

impl fmt::Debug for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Value::Tuple(self.clone()), f)
    }
}
