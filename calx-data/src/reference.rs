// calx-data - Ref cells and the ref registry
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Mutable reference cells.
//!
//! A [`Ref`] is the only mutable value. It holds a current value and an
//! ordered list of watchers. Refs live in a global registry keyed by path;
//! two refs are equal exactly when their paths are equal.
//!
//! Watchers run after the new value is visible and after every lock has been
//! released, so a watcher may read or reset the same ref.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, trace};

use crate::error::Result;
use crate::func::Function;
use crate::tag::Tag;
use crate::value::Value;

/// A mutable cell with watchers.
#[derive(Clone)]
pub struct Ref(Arc<RefSlot>);

struct RefSlot {
    path: Arc<str>,
    value: Mutex<Value>,
    watchers: Mutex<Vec<(Tag, Function)>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Ref {
    fn new(path: &str, value: Value) -> Self {
        Ref(Arc::new(RefSlot {
            path: Arc::from(path),
            value: Mutex::new(value),
            watchers: Mutex::new(Vec::new()),
        }))
    }

    /// Registry path of this ref.
    #[inline]
    pub fn path(&self) -> &str {
        &self.0.path
    }

    /// Get the current value.
    pub fn value(&self) -> Value {
        lock(&self.0.value).clone()
    }

    /// Replace the value, then call every watcher with `(new, old)` in
    /// registration order.
    ///
    /// The new value stays in place even when a watcher fails; the first
    /// watcher error is returned and later watchers are skipped.
    pub fn reset(&self, new_value: Value) -> Result<()> {
        let old_value = std::mem::replace(&mut *lock(&self.0.value), new_value.clone());
        let watchers = lock(&self.0.watchers).clone();
        trace!(path = %self.path(), watchers = watchers.len(), "ref reset");
        for (_, watcher) in &watchers {
            watcher.call(&[new_value.clone(), old_value.clone()])?;
        }
        Ok(())
    }

    /// Add a watcher. Re-adding an existing key replaces the function and
    /// keeps its original position.
    pub fn add_watch(&self, key: Tag, f: Function) {
        let mut watchers = lock(&self.0.watchers);
        match watchers.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = f,
            None => watchers.push((key, f)),
        }
    }

    /// Remove a watcher. Returns whether the key was present.
    pub fn remove_watch(&self, key: &Tag) -> bool {
        let mut watchers = lock(&self.0.watchers);
        let before = watchers.len();
        watchers.retain(|(k, _)| k != key);
        watchers.len() != before
    }

    /// Watcher keys in registration order.
    pub fn watch_keys(&self) -> Vec<Tag> {
        lock(&self.0.watchers).iter().map(|(k, _)| k.clone()).collect()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Ref) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<Ref {}: {:?}>", self.path(), self.value())
    }
}

// ============================================================================
// Registry
// ============================================================================

static REF_REGISTRY: OnceLock<Mutex<HashMap<Arc<str>, Ref>>> = OnceLock::new();
static REF_COUNTER: AtomicU64 = AtomicU64::new(0);

fn registry() -> &'static Mutex<HashMap<Arc<str>, Ref>> {
    REF_REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Generate a path that no other ref in this process has used.
pub fn fresh_ref_path() -> String {
    format!("ref:{}", REF_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Define a ref at `path`.
///
/// When a ref already lives at `path` it is returned unchanged and `value`
/// is discarded, so redefinition keeps the existing state.
pub fn define_ref(path: &str, value: Value) -> Ref {
    let mut table = lock(registry());
    if let Some(existing) = table.get(path) {
        debug!(path, "ref already defined, keeping current value");
        return existing.clone();
    }
    let cell = Ref::new(path, value);
    table.insert(Arc::from(path), cell.clone());
    cell
}

/// Create and register a ref at a fresh path.
pub fn new_ref(value: Value) -> Ref {
    define_ref(&fresh_ref_path(), value)
}

pub fn lookup_ref(path: &str) -> Option<Ref> {
    lock(registry()).get(path).cloned()
}

/// Unregister a ref. Existing handles keep working.
pub fn remove_ref(path: &str) -> Option<Ref> {
    lock(registry()).remove(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn recorder(log: Arc<Mutex<Vec<String>>>, label: &'static str) -> Function {
        Function::new(label, move |args| {
            lock(&log).push(format!("{label}:{}:{}", args[0], args[1]));
            Ok(Value::Nil)
        })
    }

    #[test]
    fn test_reset_and_value() {
        let r = new_ref(Value::number(1.0));
        assert_eq!(r.value(), Value::number(1.0));
        r.reset(Value::number(2.0)).unwrap();
        assert_eq!(r.value(), Value::number(2.0));
    }

    #[test]
    fn test_watchers_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let r = new_ref(Value::number(0.0));
        r.add_watch(Tag::new("b"), recorder(log.clone(), "b"));
        r.add_watch(Tag::new("a"), recorder(log.clone(), "a"));
        r.reset(Value::number(1.0)).unwrap();
        assert_eq!(*lock(&log), vec!["b:1:0", "a:1:0"]);
    }

    #[test]
    fn test_replace_watch_keeps_position() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let r = new_ref(Value::Nil);
        r.add_watch(Tag::new("first"), recorder(log.clone(), "x"));
        r.add_watch(Tag::new("second"), recorder(log.clone(), "y"));
        r.add_watch(Tag::new("first"), recorder(log.clone(), "z"));
        assert_eq!(r.watch_keys(), vec![Tag::new("first"), Tag::new("second")]);
        r.reset(Value::Bool(true)).unwrap();
        assert_eq!(*lock(&log), vec!["z:true:nil", "y:true:nil"]);
    }

    #[test]
    fn test_remove_watch() {
        let r = new_ref(Value::Nil);
        r.add_watch(Tag::new("w"), Function::new("w", |_| Ok(Value::Nil)));
        assert!(r.remove_watch(&Tag::new("w")));
        assert!(!r.remove_watch(&Tag::new("w")));
        assert!(r.watch_keys().is_empty());
    }

    #[test]
    fn test_watcher_error_propagates() {
        let r = new_ref(Value::Nil);
        r.add_watch(
            Tag::new("boom"),
            Function::new("boom", |_| Err(Error::native("watcher failed"))),
        );
        let err = r.reset(Value::number(5.0)).unwrap_err();
        assert_eq!(err.to_string(), "watcher failed");
        assert_eq!(r.value(), Value::number(5.0));
    }

    #[test]
    fn test_watcher_may_read_ref() {
        let r = new_ref(Value::number(0.0));
        let seen = Arc::new(Mutex::new(Value::Nil));
        let (r2, seen2) = (r.clone(), seen.clone());
        r.add_watch(
            Tag::new("peek"),
            Function::new("peek", move |_| {
                *lock(&seen2) = r2.value();
                Ok(Value::Nil)
            }),
        );
        r.reset(Value::number(9.0)).unwrap();
        assert_eq!(*lock(&seen), Value::number(9.0));
    }

    #[test]
    fn test_registry() {
        let path = fresh_ref_path();
        let a = define_ref(&path, Value::number(1.0));
        let b = define_ref(&path, Value::number(2.0));
        assert!(a.ptr_eq(&b));
        assert_eq!(b.value(), Value::number(1.0));
        assert!(lookup_ref(&path).is_some());
        assert!(remove_ref(&path).is_some());
        assert!(lookup_ref(&path).is_none());
    }

    #[test]
    fn test_equality_by_path() {
        let a = new_ref(Value::Nil);
        let b = new_ref(Value::Nil);
        assert_eq!(Value::Ref(a.clone()), Value::Ref(a.clone()));
        assert_ne!(Value::Ref(a), Value::Ref(b));
    }
}
