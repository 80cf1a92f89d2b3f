// calx-data - Generic collection access
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Variant-dispatching collection operations on [`Value`].
//!
//! These are the entry points native procedures use when they receive an
//! arbitrary value. Applying an operation to a variant that does not support
//! it fails with a type mismatch naming the operation and the variant.

use crate::error::{Error, Result};
use crate::record::field_tag;
use crate::value::Value;

/// Read a numeric index argument.
pub fn index_arg(op: &'static str, key: &Value, len: usize) -> Result<usize> {
    match key {
        Value::Number(n) if n.is_finite() && n.fract() == 0.0 => {
            if *n < 0.0 {
                Err(Error::index(op, *n as i64, len))
            } else {
                Ok(*n as usize)
            }
        }
        other => Err(Error::type_mismatch(op, "integer index", other.type_name())),
    }
}

impl Value {
    /// Optional lookup: list and tuple by index, map by key, record by field
    /// name. Absent entries and nil collections give `None`.
    pub fn lookup(&self, key: &Value) -> Result<Option<Value>> {
        match self {
            Value::Nil => Ok(None),
            Value::List(l) => Ok(l.get(index_arg("get", key, l.len())?)),
            Value::Tuple(t) => Ok(t.get(index_arg("get", key, t.len())?).ok()),
            Value::Map(m) => Ok(m.get(key)),
            Value::Record(r) => Ok(r.get_opt(&field_tag("get", key)?).cloned()),
            other => Err(Error::type_mismatch("get", "collection", other.type_name())),
        }
    }

    /// Replace the entry at `key`.
    pub fn assoc(&self, key: &Value, value: Value) -> Result<Value> {
        match self {
            Value::List(l) => Ok(Value::List(l.assoc(index_arg("assoc", key, l.len())?, value)?)),
            Value::Tuple(t) => Ok(Value::Tuple(
                t.assoc(index_arg("assoc", key, t.len())?, value)?,
            )),
            Value::Map(m) => Ok(Value::Map(m.assoc(key.clone(), value))),
            Value::Record(r) => Ok(Value::Record(r.assoc(&field_tag("assoc", key)?, value)?)),
            other => Err(Error::type_mismatch("assoc", "collection", other.type_name())),
        }
    }

    /// Remove the entry at `key`.
    pub fn dissoc(&self, key: &Value) -> Result<Value> {
        match self {
            Value::List(l) => Ok(Value::List(l.dissoc(index_arg("dissoc", key, l.len())?)?)),
            Value::Map(m) => Ok(Value::Map(m.dissoc(key))),
            other => Err(Error::type_mismatch("dissoc", "list or map", other.type_name())),
        }
    }

    /// Add an element at the end of a list.
    pub fn append(&self, item: Value) -> Result<Value> {
        match self {
            Value::List(l) => Ok(Value::List(l.append(item))),
            other => Err(Error::type_mismatch("append", "list", other.type_name())),
        }
    }

    /// Join two lists.
    pub fn concat(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Ok(Value::List(a.concat(b))),
            (Value::List(_), b) => Err(Error::type_mismatch("concat", "list", b.type_name())),
            (a, _) => Err(Error::type_mismatch("concat", "list", a.type_name())),
        }
    }

    /// Merge a map into this map or record. Merging nil is a no-op.
    pub fn merge(&self, other: &Value) -> Result<Value> {
        match (self, other) {
            (Value::Map(_) | Value::Record(_), Value::Nil) => Ok(self.clone()),
            (Value::Map(a), Value::Map(b)) => Ok(Value::Map(a.merge(b))),
            (Value::Record(r), Value::Map(b)) => {
                let mut merged = r.clone();
                for (k, v) in b.iter() {
                    merged = merged.assoc(&field_tag("merge", k)?, v.clone())?;
                }
                Ok(Value::Record(merged))
            }
            (Value::Map(_) | Value::Record(_), b) => {
                Err(Error::type_mismatch("merge", "map", b.type_name()))
            }
            (a, _) => Err(Error::type_mismatch("merge", "map", a.type_name())),
        }
    }

    /// Number of entries in a collection.
    pub fn count(&self) -> Result<usize> {
        match self {
            Value::Nil => Ok(0),
            Value::List(l) => Ok(l.len()),
            Value::Map(m) => Ok(m.len()),
            Value::Set(s) => Ok(s.len()),
            Value::Record(r) => Ok(r.len()),
            Value::Tuple(t) => Ok(t.len()),
            Value::Str(s) => Ok(s.chars().count()),
            other => Err(Error::type_mismatch("count", "collection", other.type_name())),
        }
    }

    /// Membership test: index for lists, key for maps, element for sets,
    /// field for records.
    pub fn contains(&self, key: &Value) -> Result<bool> {
        match self {
            Value::Nil => Ok(false),
            Value::List(l) => Ok(index_arg("contains", key, l.len()).is_ok_and(|idx| idx < l.len())),
            Value::Map(m) => Ok(m.contains(key)),
            Value::Set(s) => Ok(s.contains(key)),
            Value::Record(r) => Ok(r.contains(&field_tag("contains", key)?)),
            other => Err(Error::type_mismatch("contains", "collection", other.type_name())),
        }
    }
}
