// calx-core - Common test utilities
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Shared helpers for calx-core integration tests.
//!
//! - [`method_table`] - Build an implementation table from closures
//! - [`native_table`] - Procedure table with the value-level builtins
//! - [`MemoryHost`] - In-memory [`Host`] with a fixed clock

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

#[allow(unused_imports)]
pub use calx_core::{
    Error, Function, Host, NativeTable, Record, Result, Tag, Tuple, TypeKey, Value,
    register_builtins,
};

/// Implementation table named `name`; each function's name is its method name.
pub fn method_table(name: &str, methods: Vec<Function>) -> Record {
    let pairs = methods
        .into_iter()
        .map(|f| (Tag::new(f.name()), Value::Fn(f)))
        .collect();
    Record::new(Tag::new(name), pairs).unwrap()
}

pub fn native_table() -> NativeTable {
    let mut table = NativeTable::new();
    register_builtins(&mut table);
    table
}

pub fn num(n: f64) -> Value {
    Value::number(n)
}

/// Host keeping resources in memory.
#[derive(Default)]
pub struct MemoryHost {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    pub env: HashMap<String, String>,
    pub clock: u128,
}

impl Host for MemoryHost {
    fn read_resource(&self, name: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::Host(format!("read {name}: not found")))
    }

    fn write_resource(&self, name: &str, bytes: &[u8]) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn now_millis(&self) -> u128 {
        self.clock
    }

    fn exit(&self, code: i32) -> ! {
        panic!("host exit {code}")
    }
}
