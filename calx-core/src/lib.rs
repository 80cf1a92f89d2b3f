// calx-core - Dispatch and native procedures for the Calx runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # calx-core
//!
//! Runtime services layered over the Calx value model: method dispatch
//! through implementation tables, the host capability boundary, and the
//! native procedures that expose refs, EDN and dispatch to callers.

pub mod builtins;
pub mod dispatch;
pub mod host;

pub use builtins::{NativeTable, register_builtins, register_host_builtins};
pub use dispatch::{
    builtin_impls, find_method, invoke, method_names, register_builtin_impls, resolve_impls,
    unregister_builtin_impls,
};
pub use host::{Host, StdHost};

// Re-export value types for convenience
pub use calx_data::{Error, Function, Record, Result, Tag, Tuple, TypeKey, Value};
