// calx-core - Native procedure table
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Native procedures over runtime values.

mod edn;
mod host;
mod methods;
mod refs;

use std::collections::HashMap;
use std::sync::Arc;

use calx_data::{Error, Function, Result, Value};

use crate::host::Host;

use edn::{builtin_extract_cirru_edn, builtin_to_cirru_edn};
use methods::{builtin_invoke, builtin_methods_of};
use refs::{
    builtin_add_watch, builtin_defref, builtin_deref, builtin_ref, builtin_ref_p,
    builtin_remove_watch, builtin_reset,
};

/// Native procedures keyed by name.
#[derive(Debug, Default, Clone)]
pub struct NativeTable {
    procs: HashMap<Arc<str>, Function>,
}

impl NativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define (or redefine) a native procedure.
    pub fn define_native(
        &mut self,
        name: &str,
        body: impl Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    ) {
        self.procs.insert(Arc::from(name), Function::new(name, body));
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.procs.get(name)
    }

    /// Call a procedure by name.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        match self.procs.get(name) {
            Some(f) => f.call(args),
            None => Err(Error::MissingKey {
                op: "call native",
                key: name.to_string(),
                available: Vec::new(),
            }),
        }
    }

    /// Sorted procedure names.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.procs.keys().map(|k| &**k).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }
}

/// Register the value-level procedures.
pub fn register_builtins(table: &mut NativeTable) {
    // Refs
    table.define_native("ref", builtin_ref);
    table.define_native("defref", builtin_defref);
    table.define_native("ref?", builtin_ref_p);
    table.define_native("deref", builtin_deref);
    table.define_native("reset!", builtin_reset);
    table.define_native("add-watch", builtin_add_watch);
    table.define_native("remove-watch", builtin_remove_watch);

    // EDN
    table.define_native("to-cirru-edn", builtin_to_cirru_edn);
    table.define_native("extract-cirru-edn", builtin_extract_cirru_edn);

    // Methods
    table.define_native("&invoke", builtin_invoke);
    table.define_native("&methods-of", builtin_methods_of);
}

/// Register the procedures that reach the outside world through `host`.
pub fn register_host_builtins(table: &mut NativeTable, host: Arc<dyn Host>) {
    host::register(table, host);
}

/// Fail unless exactly `expected` arguments were passed.
pub(crate) fn check_arity(name: &'static str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::arity(name, expected, args.len()))
    }
}
