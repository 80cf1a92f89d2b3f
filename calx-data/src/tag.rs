// calx-data - Tag type with interning
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Tags are self-evaluating identifiers such as `:name`.
//!
//! # Interning
//!
//! Tags are interned in a global table, so two tags with the same text share
//! one allocation. Equality is a pointer comparison and the structural hash is
//! computed once, when the tag is first interned.
//!
//! Interned tags are never deallocated. Memory grows with the number of
//! distinct tag names seen by the process.
//!
//! # Thread Safety
//!
//! The interner is protected by a `Mutex`. Creating a tag takes the lock;
//! comparing and hashing tags does not.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::hash::{TAG_SEED, mix};

/// An interned tag. Printed with a leading colon.
#[derive(Clone)]
pub struct Tag {
    inner: Arc<TagInner>,
}

#[derive(Debug)]
struct TagInner {
    name: Arc<str>,
    hash: u64,
}

/// Global tag interner
static TAG_INTERNER: OnceLock<Mutex<HashMap<Arc<str>, Arc<TagInner>>>> = OnceLock::new();

fn interner() -> &'static Mutex<HashMap<Arc<str>, Arc<TagInner>>> {
    TAG_INTERNER.get_or_init(|| Mutex::new(HashMap::new()))
}

impl Tag {
    /// Intern a tag by name. The name must not include the leading colon.
    pub fn new(name: &str) -> Self {
        let mut table = interner().lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = table.get(name) {
            return Tag {
                inner: Arc::clone(existing),
            };
        }
        let name: Arc<str> = Arc::from(name);
        let inner = Arc::new(TagInner {
            hash: mix(TAG_SEED, &*name),
            name: Arc::clone(&name),
        });
        table.insert(name, Arc::clone(&inner));
        Tag { inner }
    }

    /// Parse a tag from text like `:foo`. The leading colon is optional.
    pub fn parse(s: &str) -> Self {
        Tag::new(s.strip_prefix(':').unwrap_or(s))
    }

    /// The tag's name, without the colon.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Check if two tags are the same interned tag.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Tag) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Structural hash, fixed at intern time.
    #[inline]
    pub(crate) fn cached_hash(&self) -> u64 {
        self.inner.hash
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.inner.hash);
    }
}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Ordered by text so that record field layout is stable across runs.
impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            Ordering::Equal
        } else {
            self.name().cmp(other.name())
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(:{})", self.name())
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning() {
        let a = Tag::new("foo");
        let b = Tag::new("foo");
        assert!(a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_eq!(a.cached_hash(), b.cached_hash());
    }

    #[test]
    fn test_parse_strips_colon() {
        assert_eq!(Tag::parse(":bar"), Tag::new("bar"));
        assert_eq!(Tag::parse("bar"), Tag::new("bar"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Tag::new("point").to_string(), ":point");
    }

    #[test]
    fn test_ordered_by_name() {
        let mut tags = vec![Tag::new("zeta"), Tag::new("alpha"), Tag::new("mid")];
        tags.sort();
        let names: Vec<_> = tags.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_distinct_names_differ() {
        assert_ne!(Tag::new("a"), Tag::new("b"));
        assert_ne!(Tag::new("a").cached_hash(), Tag::new("b").cached_hash());
    }
}
