// calx-data - Value types for Calx
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Core value type for Calx.
//!
//! Every value is immutable except [`Ref`], whose content can be replaced.
//! Cloning a value is cheap: composite variants are reference counted and
//! share structure between versions.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::cirru::{Cirru, needs_quote, write_quoted};
use crate::func::Function;
use crate::hash::hash_value;
use crate::list::List;
use crate::map::Map;
use crate::record::Record;
use crate::reference::Ref;
use crate::set::Set;
use crate::symbol::Symbol;
use crate::tag::Tag;
use crate::tuple::Tuple;

// ============================================================================
// TypeKey - for Method Dispatch
// ============================================================================

/// Type key for method dispatch.
///
/// Used to look up the builtin implementation table for a value's variant.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum TypeKey {
    Nil,
    Bool,
    Number,
    Str,
    Tag,
    Symbol,
    Ref,
    Fn,
    Recur,
    List,
    Map,
    Set,
    Record,
    Tuple,
    CirruQuote,
}

// ============================================================================
// Value
// ============================================================================

/// A Calx runtime value.
#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),
    Tag(Tag),
    Symbol(Symbol),
    /// Mutable cell, compared by registry path
    Ref(Ref),
    /// Callable, compared by identity
    Fn(Function),
    /// Tail-call marker carrying the next arguments
    Recur(Arc<[Value]>),
    List(List),
    Map(Map),
    Set(Set),
    Record(Record),
    Tuple(Tuple),
    /// Quoted code as a raw wire tree
    CirruQuote(Cirru),
}

impl Value {
    /// Create a number value
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    /// Create a string value
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Create a tag value from its name
    pub fn tag(name: &str) -> Self {
        Value::Tag(Tag::parse(name))
    }

    /// Create a symbol value from its name
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::parse(name))
    }

    /// Create a list from elements
    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(List::from_vec(elements))
    }

    /// Create a map from key-value pairs. Later pairs win on duplicate keys.
    pub fn map(pairs: Vec<(Value, Value)>) -> Self {
        Value::Map(Map::from_pairs(pairs))
    }

    /// Create a set from elements, dropping duplicates
    pub fn set(elements: Vec<Value>) -> Self {
        Value::Set(Set::from_values(elements))
    }

    /// Create a tuple from a tag and extra elements
    pub fn tuple(tag: Value, extra: Vec<Value>) -> Self {
        Value::Tuple(Tuple::new(tag, extra))
    }

    /// Create a recur marker
    pub fn recur(args: Vec<Value>) -> Self {
        Value::Recur(args.into())
    }

    /// Check if this value is nil
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Check if this value is truthy (not nil and not false)
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Tag(_) => "tag",
            Value::Symbol(_) => "symbol",
            Value::Ref(_) => "ref",
            Value::Fn(_) => "fn",
            Value::Recur(_) => "recur",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Set(_) => "set",
            Value::Record(_) => "record",
            Value::Tuple(_) => "tuple",
            Value::CirruQuote(_) => "quote",
        }
    }

    /// Get the type key for method dispatch.
    pub fn type_key(&self) -> TypeKey {
        match self {
            Value::Nil => TypeKey::Nil,
            Value::Bool(_) => TypeKey::Bool,
            Value::Number(_) => TypeKey::Number,
            Value::Str(_) => TypeKey::Str,
            Value::Tag(_) => TypeKey::Tag,
            Value::Symbol(_) => TypeKey::Symbol,
            Value::Ref(_) => TypeKey::Ref,
            Value::Fn(_) => TypeKey::Fn,
            Value::Recur(_) => TypeKey::Recur,
            Value::List(_) => TypeKey::List,
            Value::Map(_) => TypeKey::Map,
            Value::Set(_) => TypeKey::Set,
            Value::Record(_) => TypeKey::Record,
            Value::Tuple(_) => TypeKey::Tuple,
            Value::CirruQuote(_) => TypeKey::CirruQuote,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Value::Tag(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&Set> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_fn(&self) -> Option<&Function> {
        match self {
            Value::Fn(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_ref_cell(&self) -> Option<&Ref> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Tag> for Value {
    fn from(t: Tag) -> Self {
        Value::Tag(t)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<List> for Value {
    fn from(l: List) -> Self {
        Value::List(l)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Set> for Value {
    fn from(s: Set) -> Self {
        Value::Set(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Value::Record(r)
    }
}

impl From<Tuple> for Value {
    fn from(t: Tuple) -> Self {
        Value::Tuple(t)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Fn(f)
    }
}

impl From<Ref> for Value {
    fn from(r: Ref) -> Self {
        Value::Ref(r)
    }
}

impl From<Cirru> for Value {
    fn from(c: Cirru) -> Self {
        Value::CirruQuote(c)
    }
}

// ============================================================================
// Equality, ordering and hashing
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        crate::equal::values_equal(self, other)
    }
}

// NaN breaks reflexivity; callers that store NaN keys get what they asked for.
impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        crate::order::compare(self, other)
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(hash_value(self));
    }
}

// ============================================================================
// Display
// ============================================================================

/// Format a number the way it is printed and encoded.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{n}")
    }
}

fn write_seq<'a>(
    f: &mut fmt::Formatter<'_>,
    head: &str,
    items: impl Iterator<Item = &'a Value>,
) -> fmt::Result {
    write!(f, "({head}")?;
    for item in items {
        write!(f, " {item}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => {
                let text = format!("|{s}");
                if needs_quote(&text) {
                    write_quoted(f, &text)
                } else {
                    f.write_str(&text)
                }
            }
            Value::Tag(t) => write!(f, "{t}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Ref(r) => write!(f, "(&ref {} {})", r.path(), r.value()),
            Value::Fn(func) => write!(f, "(&fn {})", func.name()),
            Value::Recur(args) => write_seq(f, "&recur", args.iter()),
            Value::List(l) => {
                write!(f, "([]")?;
                for item in l.iter() {
                    write!(f, " {item}")?;
                }
                write!(f, ")")
            }
            Value::Map(m) => {
                write!(f, "({{}}")?;
                for (k, v) in m.iter() {
                    write!(f, " ({k} {v})")?;
                }
                write!(f, ")")
            }
            Value::Set(s) => write_seq(f, "#{}", s.iter()),
            Value::Record(r) => {
                write!(f, "(%{{}} {}", r.name())?;
                for (field, value) in r.iter() {
                    write!(f, " ({field} {value})")?;
                }
                write!(f, ")")
            }
            Value::Tuple(t) => {
                write!(f, "(:: {}", t.tag())?;
                for item in t.extra() {
                    write!(f, " {item}")?;
                }
                write!(f, ")")
            }
            Value::CirruQuote(c) => write!(f, "(quote {c})"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
