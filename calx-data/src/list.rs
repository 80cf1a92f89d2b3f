// calx-data - Persistent list
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistent list with two storage representations.
//!
//! # Slice mode
//!
//! A new list starts as a window `[start, end)` over a shared, growable
//! backing vector. Appending to a list whose window ends at the backing's
//! current end pushes in place and returns a wider window, so a chain of
//! appends costs amortised O(1) per element. Older windows are unaffected
//! because elements below their `end` are never rewritten.
//!
//! # Tree mode
//!
//! Any other update (assoc, insertion, removal, prepend, reverse) and any
//! append that cannot grow in place converts to an [`im::Vector`]. Concat
//! copies two slice-mode lists into a fresh slice and otherwise builds a
//! tree. The conversion is one-way for that value.
//!
//! The representation is never observable through equality, ordering or
//! hashing.

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use im::Vector;
use tracing::trace;

use crate::error::{Error, Result};
use crate::hash::{LIST_SEED, hash_value, mix};
use crate::value::Value;

/// Appends grow in place only while the window starts below this offset.
pub const APPEND_START_LIMIT: usize = 32;

/// An immutable, structurally shared list of values.
#[derive(Clone)]
pub struct List(Arc<ListNode>);

struct ListNode {
    repr: ListRepr,
    hash: OnceLock<u64>,
}

enum ListRepr {
    Slice {
        backing: Arc<RwLock<Vec<Value>>>,
        start: usize,
        end: usize,
    },
    Tree(Vector<Value>),
}

impl List {
    /// Create an empty list
    pub fn new() -> Self {
        List::from_vec(Vec::new())
    }

    /// Create a slice-mode list owning `items`
    pub fn from_vec(items: Vec<Value>) -> Self {
        let end = items.len();
        List::slice_of(Arc::new(RwLock::new(items)), 0, end)
    }

    fn slice_of(backing: Arc<RwLock<Vec<Value>>>, start: usize, end: usize) -> Self {
        List::from_repr(ListRepr::Slice {
            backing,
            start,
            end,
        })
    }

    fn from_tree(tree: Vector<Value>) -> Self {
        List::from_repr(ListRepr::Tree(tree))
    }

    fn from_repr(repr: ListRepr) -> Self {
        List(Arc::new(ListNode {
            repr,
            hash: OnceLock::new(),
        }))
    }

    pub fn len(&self) -> usize {
        match &self.0.repr {
            ListRepr::Slice { start, end, .. } => end - start,
            ListRepr::Tree(tree) => tree.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this list has moved to tree storage.
    pub fn is_tree(&self) -> bool {
        matches!(self.0.repr, ListRepr::Tree(_))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &List) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Element at `idx`, or `None` past the end.
    pub fn get(&self, idx: usize) -> Option<Value> {
        match &self.0.repr {
            ListRepr::Slice {
                backing,
                start,
                end,
            } => {
                if idx < end - start {
                    let items = backing.read().unwrap_or_else(PoisonError::into_inner);
                    items.get(start + idx).cloned()
                } else {
                    None
                }
            }
            ListRepr::Tree(tree) => tree.get(idx).cloned(),
        }
    }

    /// Element at `idx`, failing with an index error past the end.
    pub fn nth(&self, idx: usize) -> Result<Value> {
        self.get(idx)
            .ok_or_else(|| Error::index("nth", idx, self.len()))
    }

    pub fn first(&self) -> Option<Value> {
        self.get(0)
    }

    /// Everything but the first element. Empty for an empty list.
    pub fn rest(&self) -> List {
        if self.is_empty() {
            return self.clone();
        }
        match &self.0.repr {
            ListRepr::Slice {
                backing,
                start,
                end,
            } => List::slice_of(Arc::clone(backing), start + 1, *end),
            ListRepr::Tree(tree) => List::from_tree(tree.skip(1)),
        }
    }

    pub fn iter(&self) -> Iter {
        let inner = match &self.0.repr {
            ListRepr::Slice {
                backing,
                start,
                end,
            } => IterInner::Slice {
                backing: Arc::clone(backing),
                pos: *start,
                end: *end,
            },
            ListRepr::Tree(tree) => IterInner::Tree(tree.clone().into_iter()),
        };
        Iter { inner }
    }

    pub fn to_vec(&self) -> Vec<Value> {
        match &self.0.repr {
            ListRepr::Slice {
                backing,
                start,
                end,
            } => {
                let items = backing.read().unwrap_or_else(PoisonError::into_inner);
                items[*start..*end].to_vec()
            }
            ListRepr::Tree(tree) => tree.iter().cloned().collect(),
        }
    }

    fn to_tree(&self) -> Vector<Value> {
        match &self.0.repr {
            ListRepr::Slice {
                backing,
                start,
                end,
            } => {
                trace!(len = end - start, "list switching to tree storage");
                let items = backing.read().unwrap_or_else(PoisonError::into_inner);
                items[*start..*end].iter().cloned().collect()
            }
            ListRepr::Tree(tree) => tree.clone(),
        }
    }

    /// Add `item` at the end.
    pub fn append(&self, item: Value) -> List {
        if let ListRepr::Slice {
            backing,
            start,
            end,
        } = &self.0.repr
        {
            if *start < APPEND_START_LIMIT {
                // Check and push under one write lock so that two appends
                // racing on the same window cannot both grow it.
                let mut items = backing.write().unwrap_or_else(PoisonError::into_inner);
                if items.len() == *end {
                    items.push(item);
                    drop(items);
                    return List::slice_of(Arc::clone(backing), *start, end + 1);
                }
            }
        }
        let mut tree = self.to_tree();
        tree.push_back(item);
        List::from_tree(tree)
    }

    /// Add `item` at the front.
    pub fn prepend(&self, item: Value) -> List {
        let mut tree = self.to_tree();
        tree.push_front(item);
        List::from_tree(tree)
    }

    /// Replace the element at `idx`.
    pub fn assoc(&self, idx: usize, item: Value) -> Result<List> {
        self.check_index("assoc", idx)?;
        Ok(List::from_tree(self.to_tree().update(idx, item)))
    }

    /// Insert `item` before the element at `idx`.
    pub fn assoc_before(&self, idx: usize, item: Value) -> Result<List> {
        self.check_index("assoc-before", idx)?;
        let mut tree = self.to_tree();
        tree.insert(idx, item);
        Ok(List::from_tree(tree))
    }

    /// Insert `item` after the element at `idx`.
    pub fn assoc_after(&self, idx: usize, item: Value) -> Result<List> {
        self.check_index("assoc-after", idx)?;
        let mut tree = self.to_tree();
        tree.insert(idx + 1, item);
        Ok(List::from_tree(tree))
    }

    /// Remove the element at `idx`.
    pub fn dissoc(&self, idx: usize) -> Result<List> {
        self.check_index("dissoc", idx)?;
        let mut tree = self.to_tree();
        tree.remove(idx);
        Ok(List::from_tree(tree))
    }

    /// Elements in `[from, to)`.
    ///
    /// A slice-mode list shares its backing with the result.
    pub fn slice(&self, from: usize, to: usize) -> Result<List> {
        let len = self.len();
        if to > len {
            return Err(Error::index("slice", to, len));
        }
        if from > to {
            return Err(Error::index("slice", from, to));
        }
        Ok(match &self.0.repr {
            ListRepr::Slice { backing, start, .. } => {
                List::slice_of(Arc::clone(backing), start + from, start + to)
            }
            ListRepr::Tree(tree) => List::from_tree(tree.clone().slice(from..to)),
        })
    }

    /// Elements of `self` followed by elements of `other`.
    pub fn concat(&self, other: &List) -> List {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        if !self.is_tree() && !other.is_tree() {
            return List::from_vec(self.iter().chain(other.iter()).collect());
        }
        let mut tree = self.to_tree();
        tree.append(other.to_tree());
        List::from_tree(tree)
    }

    pub fn reverse(&self) -> List {
        let mut items = self.to_vec();
        items.reverse();
        List::from_tree(Vector::from(items))
    }

    /// Apply `f` to each element, keeping the storage representation.
    pub fn map(&self, mut f: impl FnMut(&Value) -> Value) -> List {
        match &self.0.repr {
            ListRepr::Slice { .. } => List::from_vec(self.iter().map(|v| f(&v)).collect()),
            ListRepr::Tree(tree) => List::from_tree(tree.iter().map(f).collect()),
        }
    }

    fn check_index(&self, op: &'static str, idx: usize) -> Result<()> {
        let len = self.len();
        if idx < len {
            Ok(())
        } else {
            Err(Error::index(op, idx, len))
        }
    }

    pub(crate) fn cached_hash(&self) -> u64 {
        *self
            .0
            .hash
            .get_or_init(|| self.iter().fold(LIST_SEED, |acc, v| mix(acc, &hash_value(&v))))
    }

    pub(crate) fn peek_hash(&self) -> Option<u64> {
        self.0.hash.get().copied()
    }
}

impl Default for List {
    fn default() -> Self {
        List::new()
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List::from_vec(iter.into_iter().collect())
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Owning iterator over a list's elements.
pub struct Iter {
    inner: IterInner,
}

enum IterInner {
    Slice {
        backing: Arc<RwLock<Vec<Value>>>,
        pos: usize,
        end: usize,
    },
    Tree(im::vector::ConsumingIter<Value>),
}

impl Iterator for Iter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match &mut self.inner {
            IterInner::Slice { backing, pos, end } => {
                if *pos >= *end {
                    return None;
                }
                let items = backing.read().unwrap_or_else(PoisonError::into_inner);
                let item = items.get(*pos).cloned();
                *pos += 1;
                item
            }
            IterInner::Tree(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Slice { pos, end, .. } => {
                let n = end.saturating_sub(*pos);
                (n, Some(n))
            }
            IterInner::Tree(it) => it.size_hint(),
        }
    }
}

impl IntoIterator for &List {
    type Item = Value;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}
