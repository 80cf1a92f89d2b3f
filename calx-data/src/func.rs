// calx-data - Native function values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Callable values.
//!
//! A [`Function`] wraps a native closure. Functions are compared by identity
//! and hash by an identity number drawn from a process-wide counter the first
//! time the hash is requested.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::error::Result;
use crate::hash::{FN_SEED, mix, next_identity};
use crate::value::Value;

/// Signature of a native function body.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A named, callable value.
#[derive(Clone)]
pub struct Function(Arc<FunctionInner>);

struct FunctionInner {
    name: Arc<str>,
    body: Box<NativeFn>,
    identity: OnceLock<u64>,
}

impl Function {
    pub fn new(
        name: &str,
        body: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Function(Arc::new(FunctionInner {
            name: Arc::from(name),
            body: Box::new(body),
            identity: OnceLock::new(),
        }))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Call the function with the given arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.0.body)(args)
    }

    #[inline]
    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identity number, assigned on first request and stable afterwards.
    pub(crate) fn identity(&self) -> u64 {
        *self.0.identity.get_or_init(next_identity)
    }

    pub(crate) fn cached_hash(&self) -> u64 {
        mix(FN_SEED, &self.identity())
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<fn {}>", self.name())
    }
}
