// calx-core - Method dispatch over implementation tables
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Ad hoc method dispatch.
//!
//! An implementation table is a [`Record`] whose fields are method names and
//! whose values are functions. Records and tuples carry their own list of
//! tables; every other type is served by a process-wide default list keyed
//! by [`TypeKey`]. Tables are searched in order and the first one defining
//! the method wins.

use std::collections::{BTreeSet, HashMap};
use std::sync::{OnceLock, PoisonError, RwLock};

use calx_data::{Error, Record, Result, Tag, TypeKey, Value};
use tracing::{debug, trace};

// ============================================================================
// Default Tables for Built-in Types
// ============================================================================

type ImplRegistry = RwLock<HashMap<TypeKey, Vec<Record>>>;

static BUILTIN_IMPLS: OnceLock<ImplRegistry> = OnceLock::new();

fn registry() -> &'static ImplRegistry {
    BUILTIN_IMPLS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Install the default implementation tables for a type, replacing any
/// previous registration.
pub fn register_builtin_impls(key: TypeKey, impls: Vec<Record>) {
    let mut table = registry().write().unwrap_or_else(PoisonError::into_inner);
    if table.insert(key, impls).is_some() {
        debug!(?key, "replaced default impls");
    }
}

/// Default implementation tables registered for a type.
pub fn builtin_impls(key: TypeKey) -> Vec<Record> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
        .cloned()
        .unwrap_or_default()
}

/// Drop the default tables for a type, returning them.
pub fn unregister_builtin_impls(key: TypeKey) -> Option<Vec<Record>> {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&key)
}

// ============================================================================
// Resolution
// ============================================================================

/// The implementation tables consulted when invoking a method on `obj`.
///
/// Records and tuples with an empty own list fall back to the defaults
/// registered for their type.
pub fn resolve_impls(obj: &Value) -> Vec<Record> {
    let own = match obj {
        Value::Record(r) => r.impls(),
        Value::Tuple(t) => t.impls(),
        _ => &[],
    };
    if own.is_empty() {
        builtin_impls(obj.type_key())
    } else {
        own.to_vec()
    }
}

/// Look up a method on `obj` without calling it.
pub fn find_method(obj: &Value, method: &str) -> Option<Value> {
    let key = Tag::new(method);
    resolve_impls(obj)
        .iter()
        .find_map(|table| table.get_opt(&key).cloned())
}

/// Every method name reachable from `obj`, sorted and deduplicated.
pub fn method_names(obj: &Value) -> Vec<String> {
    resolve_impls(obj)
        .iter()
        .flat_map(|table| table.fields().iter().map(|f| f.name().to_string()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Call `method` on `obj`, passing `obj` as the first argument.
pub fn invoke(obj: &Value, method: &str, args: &[Value]) -> Result<Value> {
    let Some(target) = find_method(obj, method) else {
        return Err(Error::DispatchError {
            method: method.to_string(),
            value: obj.to_string(),
            type_tag: type_tag(obj),
            available: method_names(obj),
        });
    };
    let Value::Fn(f) = &target else {
        return Err(Error::type_mismatch("invoke", "fn", target.type_name()));
    };
    trace!(method, callee = f.name(), "invoke");
    let mut call_args = Vec::with_capacity(args.len() + 1);
    call_args.push(obj.clone());
    call_args.extend_from_slice(args);
    f.call(&call_args)
}

/// Name used for `obj`'s type in dispatch errors.
fn type_tag(obj: &Value) -> String {
    match obj {
        Value::Record(r) => r.name().to_string(),
        Value::Tuple(t) => t.tag().to_string(),
        other => other.type_name().to_string(),
    }
}
