// calx-data - Records
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Records are named, fixed-schema structs.
//!
//! A record carries a name tag, a field array sorted by tag text, a value
//! array aligned with it, and an optional list of implementation records used
//! by method dispatch. The field array is reference counted and shared by
//! every record derived from the same schema, so `assoc` copies only the
//! values.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::{Error, Result};
use crate::hash::{RECORD_SEED, hash_value, mix};
use crate::map::Map;
use crate::tag::Tag;
use crate::value::Value;

/// A record instance.
#[derive(Clone)]
pub struct Record(Arc<RecordNode>);

struct RecordNode {
    name: Tag,
    fields: Arc<[Tag]>,
    values: Vec<Value>,
    impls: Arc<[Record]>,
    hash: OnceLock<u64>,
}

/// Resolve a field key given as a tag, string or symbol.
pub fn field_tag(op: &'static str, key: &Value) -> Result<Tag> {
    match key {
        Value::Tag(t) => Ok(t.clone()),
        Value::Str(s) => Ok(Tag::new(s)),
        Value::Symbol(s) => Ok(Tag::new(s.name())),
        other => Err(Error::type_mismatch(op, "tag", other.type_name())),
    }
}

impl Record {
    /// Build a record from field/value pairs in any order.
    pub fn new(name: Tag, pairs: Vec<(Tag, Value)>) -> Result<Record> {
        let mut pairs = pairs;
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some(dup) = pairs.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(Error::DuplicateField {
                context: format!("record {name}"),
                field: dup[0].0.to_string(),
            });
        }
        let (fields, values): (Vec<Tag>, Vec<Value>) = pairs.into_iter().unzip();
        Ok(Record::from_parts(name, fields.into(), values, Arc::from(Vec::new())))
    }

    /// Build a schema prototype whose values are all nil.
    pub fn schema(name: Tag, fields: Vec<Tag>) -> Result<Record> {
        Record::new(name, fields.into_iter().map(|f| (f, Value::Nil)).collect())
    }

    fn from_parts(name: Tag, fields: Arc<[Tag]>, values: Vec<Value>, impls: Arc<[Record]>) -> Self {
        Record(Arc::new(RecordNode {
            name,
            fields,
            values,
            impls,
            hash: OnceLock::new(),
        }))
    }

    /// A record sharing this schema and implementations, with new values.
    fn with_values(&self, values: Vec<Value>) -> Record {
        Record::from_parts(
            self.0.name.clone(),
            Arc::clone(&self.0.fields),
            values,
            Arc::clone(&self.0.impls),
        )
    }

    #[inline]
    pub fn name(&self) -> &Tag {
        &self.0.name
    }

    /// Field tags, sorted by text.
    #[inline]
    pub fn fields(&self) -> &Arc<[Tag]> {
        &self.0.fields
    }

    /// Values aligned with [`fields`](Self::fields).
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.0.values
    }

    #[inline]
    pub fn impls(&self) -> &[Record] {
        &self.0.impls
    }

    pub fn len(&self) -> usize {
        self.0.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.fields.is_empty()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Record) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Attach implementation records used by method dispatch.
    pub fn with_impls(&self, impls: Vec<Record>) -> Record {
        Record::from_parts(
            self.0.name.clone(),
            Arc::clone(&self.0.fields),
            self.0.values.clone(),
            impls.into(),
        )
    }

    /// Position of `field` in the schema.
    pub fn index_of(&self, field: &Tag) -> Option<usize> {
        self.0.fields.binary_search(field).ok()
    }

    pub fn contains(&self, field: &Tag) -> bool {
        self.index_of(field).is_some()
    }

    /// Value of `field`, or `None` if the schema lacks it.
    pub fn get_opt(&self, field: &Tag) -> Option<&Value> {
        self.index_of(field).map(|idx| &self.0.values[idx])
    }

    /// Value of `field`, failing when the schema lacks it.
    pub fn get(&self, field: &Tag) -> Result<Value> {
        self.get_opt(field)
            .cloned()
            .ok_or_else(|| Error::MissingKey {
                op: "record get",
                key: field.to_string(),
                available: self.field_names(),
            })
    }

    /// Replace one field's value. The schema is shared with the result.
    pub fn assoc(&self, field: &Tag, value: Value) -> Result<Record> {
        let idx = self.index_of(field).ok_or_else(|| self.unknown_field(field))?;
        let mut values = self.0.values.clone();
        values[idx] = value;
        Ok(self.with_values(values))
    }

    /// Fill this schema from pairs that name every field exactly once.
    pub fn with_pairs(&self, pairs: Vec<(Tag, Value)>) -> Result<Record> {
        let mut values: Vec<Option<Value>> = vec![None; self.len()];
        for (field, value) in pairs {
            let idx = self.index_of(&field).ok_or_else(|| self.unknown_field(&field))?;
            if values[idx].is_some() {
                return Err(Error::DuplicateField {
                    context: format!("record {}", self.name()),
                    field: field.to_string(),
                });
            }
            values[idx] = Some(value);
        }
        let values = self.require_all(values)?;
        Ok(self.with_values(values))
    }

    /// Fill this schema from a map or another record. Keys may be tags,
    /// strings or symbols; every field must be present.
    pub fn from_map(&self, data: &Value) -> Result<Record> {
        let mut values: Vec<Option<Value>> = vec![None; self.len()];
        match data {
            Value::Map(m) => {
                for (k, v) in m.iter() {
                    let field = field_tag("record from map", k)?;
                    if let Some(idx) = self.index_of(&field) {
                        values[idx] = Some(v.clone());
                    }
                }
            }
            Value::Record(other) => {
                for (field, v) in other.iter() {
                    if let Some(idx) = self.index_of(field) {
                        values[idx] = Some(v.clone());
                    }
                }
            }
            other => {
                return Err(Error::type_mismatch(
                    "record from map",
                    "map or record",
                    other.type_name(),
                ));
            }
        }
        let values = self.require_all(values)?;
        Ok(self.with_values(values))
    }

    /// Convert to a map keyed by field tags.
    pub fn to_map(&self) -> Map {
        Map::from_pairs(
            self.iter()
                .map(|(f, v)| (Value::Tag(f.clone()), v.clone()))
                .collect(),
        )
    }

    /// Same name and same field set.
    pub fn same_shape(&self, other: &Record) -> bool {
        self.name() == other.name()
            && (Arc::ptr_eq(&self.0.fields, &other.0.fields) || self.fields() == other.fields())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &Value)> {
        self.0.fields.iter().zip(self.0.values.iter())
    }

    fn field_names(&self) -> Vec<String> {
        self.0.fields.iter().map(Tag::to_string).collect()
    }

    fn unknown_field(&self, field: &Tag) -> Error {
        Error::UnknownField {
            record: self.name().to_string(),
            field: field.to_string(),
            available: self.field_names(),
        }
    }

    fn require_all(&self, values: Vec<Option<Value>>) -> Result<Vec<Value>> {
        values
            .into_iter()
            .zip(self.0.fields.iter())
            .map(|(value, field)| {
                value.ok_or_else(|| Error::MissingKey {
                    op: "record fill",
                    key: field.to_string(),
                    available: Vec::new(),
                })
            })
            .collect()
    }

    pub(crate) fn cached_hash(&self) -> u64 {
        *self.0.hash.get_or_init(|| {
            self.iter()
                .fold(mix(RECORD_SEED, &self.name().cached_hash()), |acc, (f, v)| {
                    mix(mix(acc, &f.cached_hash()), &hash_value(v))
                })
        })
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Value::Record(self.clone()), f)
    }
}
