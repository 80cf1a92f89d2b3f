// calx-data - Persistent map
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Persistent hash map with three representations.
//!
//! - **Slice**: a flat vector of pairs, used while the map is small. Lookup
//!   is a linear scan by structural equality.
//! - **Tree**: an [`im::HashMap`] keyed by structural hash and equality.
//! - **Chain**: the lazy result of a merge. A front map layered over a back
//!   map, with an optional skip sentinel whose entries in the front layer are
//!   ignored. Lookups check the front layer first. Any operation that needs the
//!   full entry set squashes the chain once and caches the result.
//!
//! Chains are bounded in depth; merging past the bound squashes eagerly.
//! Small slice maps are merged eagerly instead of chained.

use std::fmt;
use std::sync::{Arc, OnceLock};

use im::HashMap;
use tracing::trace;

use crate::equal::values_equal;
use crate::error::{Error, Result};
use crate::hash::hash_map_entries;
use crate::set::Set;
use crate::value::Value;

/// Largest entry count stored as a flat slice.
pub const MAP_SLICE_LIMIT: usize = 16;
/// Two slice maps whose combined size fits here merge eagerly.
pub const MERGE_SLICE_LIMIT: usize = 24;
/// Deepest merge chain kept lazy.
pub const CHAIN_DEPTH_LIMIT: usize = 5;

/// An immutable, structurally shared map from values to values.
#[derive(Clone)]
pub struct Map(Arc<MapNode>);

struct MapNode {
    repr: MapRepr,
    hash: OnceLock<u64>,
}

enum MapRepr {
    Slice(Vec<(Value, Value)>),
    Tree(HashMap<Value, Value>),
    Chain(Chain),
}

struct Chain {
    front: Map,
    skip: Option<Value>,
    back: Map,
    depth: usize,
    squashed: OnceLock<Map>,
}

impl Chain {
    fn front_get(&self, key: &Value) -> Option<Value> {
        let value = self.front.get(key)?;
        match &self.skip {
            Some(sentinel) if values_equal(&value, sentinel) => None,
            _ => Some(value),
        }
    }

    fn squashed(&self) -> &Map {
        self.squashed.get_or_init(|| {
            trace!(depth = self.depth, "squashing map chain");
            let mut tree = self.back.to_tree();
            for (k, v) in self.front.iter() {
                if let Some(sentinel) = &self.skip {
                    if values_equal(v, sentinel) {
                        continue;
                    }
                }
                tree.insert(k.clone(), v.clone());
            }
            Map::from_tree(tree)
        })
    }
}

impl Map {
    /// Create an empty map
    pub fn new() -> Self {
        Map::from_repr(MapRepr::Slice(Vec::new()))
    }

    /// Build a map from pairs. Later pairs win on duplicate keys.
    pub fn from_pairs(pairs: Vec<(Value, Value)>) -> Self {
        if pairs.len() <= MAP_SLICE_LIMIT {
            let mut entries: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
            for (k, v) in pairs {
                match entries.iter_mut().find(|(ek, _)| values_equal(ek, &k)) {
                    Some(slot) => slot.1 = v,
                    None => entries.push((k, v)),
                }
            }
            Map::from_repr(MapRepr::Slice(entries))
        } else {
            Map::from_tree(pairs.into_iter().collect())
        }
    }

    fn from_tree(tree: HashMap<Value, Value>) -> Self {
        Map::from_repr(MapRepr::Tree(tree))
    }

    fn from_repr(repr: MapRepr) -> Self {
        Map(Arc::new(MapNode {
            repr,
            hash: OnceLock::new(),
        }))
    }

    /// The map with every merge layer applied. A no-op unless chained.
    /// The result is never itself a chain.
    fn resolved(&self) -> &Map {
        match &self.0.repr {
            MapRepr::Chain(chain) => chain.squashed(),
            _ => self,
        }
    }

    fn depth(&self) -> usize {
        match &self.0.repr {
            MapRepr::Chain(chain) => chain.depth,
            _ => 0,
        }
    }

    /// Whether this map is an unsquashed merge chain.
    pub fn is_chain(&self) -> bool {
        matches!(self.0.repr, MapRepr::Chain(_))
    }

    /// Whether this map has moved to hash-tree storage.
    pub fn is_tree(&self) -> bool {
        matches!(self.0.repr, MapRepr::Tree(_))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn len(&self) -> usize {
        match &self.0.repr {
            MapRepr::Slice(entries) => entries.len(),
            MapRepr::Tree(tree) => tree.len(),
            MapRepr::Chain(chain) => chain.squashed().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value for `key`, or `None` if absent.
    pub fn get(&self, key: &Value) -> Option<Value> {
        match &self.0.repr {
            MapRepr::Slice(entries) => entries
                .iter()
                .find(|(k, _)| values_equal(k, key))
                .map(|(_, v)| v.clone()),
            MapRepr::Tree(tree) => tree.get(key).cloned(),
            MapRepr::Chain(chain) => chain.front_get(key).or_else(|| chain.back.get(key)),
        }
    }

    /// Value for `key`, failing when absent.
    pub fn get_strict(&self, key: &Value) -> Result<Value> {
        self.get(key)
            .ok_or_else(|| Error::missing_key("get", key.to_string()))
    }

    pub fn contains(&self, key: &Value) -> bool {
        match &self.resolved().0.repr {
            MapRepr::Slice(entries) => entries.iter().any(|(k, _)| values_equal(k, key)),
            MapRepr::Tree(tree) => tree.contains_key(key),
            MapRepr::Chain(_) => false,
        }
    }

    /// Return a map with `key` bound to `value`.
    pub fn assoc(&self, key: Value, value: Value) -> Map {
        match &self.resolved().0.repr {
            MapRepr::Slice(entries) => {
                let mut entries = entries.clone();
                if let Some(slot) = entries.iter_mut().find(|(k, _)| values_equal(k, &key)) {
                    slot.1 = value;
                    return Map::from_repr(MapRepr::Slice(entries));
                }
                if entries.len() < MAP_SLICE_LIMIT {
                    entries.push((key, value));
                    Map::from_repr(MapRepr::Slice(entries))
                } else {
                    trace!(len = entries.len() + 1, "map switching to tree storage");
                    let mut tree: HashMap<Value, Value> = entries.into_iter().collect();
                    tree.insert(key, value);
                    Map::from_tree(tree)
                }
            }
            MapRepr::Tree(tree) => Map::from_tree(tree.update(key, value)),
            MapRepr::Chain(_) => self.clone(),
        }
    }

    /// Return a map without `key`.
    pub fn dissoc(&self, key: &Value) -> Map {
        match &self.resolved().0.repr {
            MapRepr::Slice(entries) => Map::from_repr(MapRepr::Slice(
                entries
                    .iter()
                    .filter(|(k, _)| !values_equal(k, key))
                    .cloned()
                    .collect(),
            )),
            MapRepr::Tree(tree) => Map::from_tree(tree.without(key)),
            MapRepr::Chain(_) => self.clone(),
        }
    }

    /// Entries of `other` override entries of `self`.
    pub fn merge(&self, other: &Map) -> Map {
        self.merge_layer(other, None)
    }

    /// Like [`merge`](Self::merge), but entries of `other` whose value equals
    /// `sentinel` are ignored.
    pub fn merge_skip(&self, other: &Map, sentinel: &Value) -> Map {
        self.merge_layer(other, Some(sentinel.clone()))
    }

    fn merge_layer(&self, other: &Map, skip: Option<Value>) -> Map {
        if let (MapRepr::Slice(front), MapRepr::Slice(back)) = (&other.0.repr, &self.0.repr) {
            if front.is_empty() {
                return self.clone();
            }
            if front.len() + back.len() <= MERGE_SLICE_LIMIT {
                let mut merged = self.clone();
                for (k, v) in front {
                    if skip.as_ref().is_some_and(|s| values_equal(v, s)) {
                        continue;
                    }
                    merged = merged.assoc(k.clone(), v.clone());
                }
                return merged;
            }
        }
        let depth = self.depth() + other.depth() + 1;
        let chain = Chain {
            front: other.clone(),
            skip,
            back: self.clone(),
            depth,
            squashed: OnceLock::new(),
        };
        if depth > CHAIN_DEPTH_LIMIT {
            return chain.squashed().clone();
        }
        Map::from_repr(MapRepr::Chain(chain))
    }

    /// Iterate over entries. Order is unspecified.
    pub fn iter(&self) -> Iter<'_> {
        match &self.0.repr {
            MapRepr::Slice(entries) => Iter::Slice(entries.iter()),
            MapRepr::Tree(tree) => Iter::Tree(tree.iter()),
            MapRepr::Chain(chain) => chain.squashed().iter(),
        }
    }

    pub fn keys(&self) -> Vec<Value> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<Value> {
        self.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn to_pairs(&self) -> Vec<(Value, Value)> {
        self.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Entries of `self` whose key is absent from `other`.
    pub fn diff_new(&self, other: &Map) -> Map {
        Map::from_pairs(
            self.iter()
                .filter(|(k, _)| !other.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }

    /// Keys of `self` absent from `other`.
    pub fn diff_keys(&self, other: &Map) -> Set {
        Set::from_values(
            self.iter()
                .filter(|(k, _)| !other.contains(k))
                .map(|(k, _)| k.clone())
                .collect(),
        )
    }

    /// Keys present in both maps.
    pub fn common_keys(&self, other: &Map) -> Set {
        Set::from_values(
            self.iter()
                .filter(|(k, _)| other.contains(k))
                .map(|(k, _)| k.clone())
                .collect(),
        )
    }

    fn to_tree(&self) -> HashMap<Value, Value> {
        match &self.resolved().0.repr {
            MapRepr::Slice(entries) => entries.iter().cloned().collect(),
            MapRepr::Tree(tree) => tree.clone(),
            MapRepr::Chain(_) => HashMap::new(),
        }
    }

    pub(crate) fn cached_hash(&self) -> u64 {
        *self.0.hash.get_or_init(|| hash_map_entries(self))
    }

    pub(crate) fn peek_hash(&self) -> Option<u64> {
        self.0.hash.get().copied()
    }
}

impl Default for Map {
    fn default() -> Self {
        Map::new()
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Map::from_pairs(iter.into_iter().collect())
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Borrowing iterator over map entries.
pub enum Iter<'a> {
    Slice(std::slice::Iter<'a, (Value, Value)>),
    Tree(im::hashmap::Iter<'a, Value, Value>),
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Value, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Slice(it) => it.next().map(|(k, v)| (k, v)),
            Iter::Tree(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Slice(it) => it.size_hint(),
            Iter::Tree(it) => it.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(n: f64) -> Value {
        Value::number(n)
    }

    fn range_map(from: usize, to: usize, value: f64) -> Map {
        Map::from_pairs((from..to).map(|i| (num(i as f64), num(value))).collect())
    }

    #[test]
    fn test_slice_to_tree_threshold() {
        let small = range_map(0, MAP_SLICE_LIMIT, 0.0);
        assert!(!small.is_tree());
        let grown = small.assoc(num(100.0), num(1.0));
        assert!(grown.is_tree());
        assert_eq!(grown.len(), MAP_SLICE_LIMIT + 1);
        assert_eq!(grown.get(&num(3.0)), Some(num(0.0)));
    }

    #[test]
    fn test_assoc_dissoc() {
        let m = Map::new().assoc(num(1.0), num(10.0)).assoc(num(1.0), num(11.0));
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&num(1.0)), Some(num(11.0)));
        let empty = m.dissoc(&num(1.0));
        assert!(empty.is_empty());
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_get_strict_missing() {
        let m = Map::new();
        assert!(matches!(
            m.get_strict(&Value::tag("k")),
            Err(Error::MissingKey { .. })
        ));
    }

    #[test]
    fn test_small_merge_is_eager() {
        let a = range_map(0, 4, 0.0);
        let b = range_map(2, 6, 1.0);
        let merged = a.merge(&b);
        assert!(!merged.is_chain());
        assert_eq!(merged.len(), 6);
        assert_eq!(merged.get(&num(0.0)), Some(num(0.0)));
        assert_eq!(merged.get(&num(3.0)), Some(num(1.0)));
    }

    #[test]
    fn test_large_merge_chains() {
        let a = range_map(0, 20, 0.0);
        let b = range_map(10, 30, 1.0);
        let merged = a.merge(&b);
        assert!(merged.is_chain());
        assert_eq!(merged.get(&num(5.0)), Some(num(0.0)));
        assert_eq!(merged.get(&num(15.0)), Some(num(1.0)));
        assert_eq!(merged.len(), 30);
        assert_eq!(Value::Map(merged), Value::Map(a.merge(&b)));
    }

    #[test]
    fn test_chain_depth_bounded() {
        let mut m = range_map(0, 20, 0.0);
        for round in 1..=(CHAIN_DEPTH_LIMIT + 3) {
            m = m.merge(&range_map(round * 20, round * 20 + 20, round as f64));
            assert!(m.depth() <= CHAIN_DEPTH_LIMIT);
        }
        assert_eq!(m.len(), 20 * (CHAIN_DEPTH_LIMIT + 4));
        assert_eq!(m.get(&num(25.0)), Some(num(1.0)));
    }

    #[test]
    fn test_merge_skip() {
        let base = Map::from_pairs(vec![(num(1.0), num(1.0)), (num(2.0), num(2.0))]);
        let over = Map::from_pairs(vec![(num(1.0), Value::Nil), (num(2.0), num(20.0))]);
        let merged = base.merge_skip(&over, &Value::Nil);
        assert_eq!(merged.get(&num(1.0)), Some(num(1.0)));
        assert_eq!(merged.get(&num(2.0)), Some(num(20.0)));
    }

    #[test]
    fn test_merge_skip_chained() {
        let base = range_map(0, 20, 0.0);
        let mut over_pairs: Vec<(Value, Value)> =
            (0..20).map(|i| (num(i as f64), num(5.0))).collect();
        over_pairs[3].1 = Value::Nil;
        let over = Map::from_pairs(over_pairs);
        let merged = base.merge_skip(&over, &Value::Nil);
        assert!(merged.is_chain());
        assert_eq!(merged.get(&num(3.0)), Some(num(0.0)));
        assert_eq!(merged.get(&num(4.0)), Some(num(5.0)));
        assert_eq!(merged.to_pairs().len(), 20);
        assert!(merged.contains(&num(3.0)));
    }

    #[test]
    fn test_merge_into_empty_front() {
        let a = range_map(0, 3, 0.0);
        assert!(a.merge(&Map::new()).ptr_eq(&a));
    }

    #[test]
    fn test_diffs() {
        let a = range_map(0, 4, 0.0);
        let b = range_map(2, 6, 0.0);
        assert_eq!(a.diff_new(&b).len(), 2);
        assert_eq!(
            Value::Set(a.diff_keys(&b)),
            Value::set(vec![num(0.0), num(1.0)])
        );
        assert_eq!(
            Value::Set(a.common_keys(&b)),
            Value::set(vec![num(2.0), num(3.0)])
        );
    }

    #[test]
    fn test_representation_invisible() {
        let slice = range_map(0, 3, 0.0);
        let tree = range_map(0, 30, 0.0);
        let shrunk = (3..30).fold(tree, |m, i| m.dissoc(&num(i as f64)));
        assert!(shrunk.is_tree());
        assert_eq!(Value::Map(slice.clone()), Value::Map(shrunk.clone()));
        assert_eq!(slice.cached_hash(), shrunk.cached_hash());
    }
}
