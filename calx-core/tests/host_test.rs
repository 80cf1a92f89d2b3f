// calx-core - Host procedure tests
// Copyright (c) 2025 Tom Waddington. MIT licensed.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use calx_core::register_host_builtins;
use common::*;

fn host_table(host: Arc<MemoryHost>) -> NativeTable {
    let mut table = NativeTable::new();
    register_host_builtins(&mut table, host);
    table
}

#[test]
fn test_write_then_read() {
    let host = Arc::new(MemoryHost::default());
    let table = host_table(Arc::clone(&host));
    table
        .call("write-file", &[Value::string("a.cirru"), Value::string("([] 1)")])
        .unwrap();
    assert_eq!(
        table.call("read-file", &[Value::string("a.cirru")]).unwrap(),
        Value::string("([] 1)")
    );
    assert!(host.files.lock().unwrap().contains_key("a.cirru"));
}

#[test]
fn test_missing_resource_is_host_error() {
    let table = host_table(Arc::new(MemoryHost::default()));
    let err = table
        .call("read-file", &[Value::string("nope")])
        .unwrap_err();
    assert!(matches!(err, Error::Host(_)));
}

#[test]
fn test_invalid_utf8() {
    let host = MemoryHost::default();
    host.files
        .lock()
        .unwrap()
        .insert("bin".to_string(), vec![0xff, 0xfe]);
    let table = host_table(Arc::new(host));
    assert!(matches!(
        table.call("read-file", &[Value::string("bin")]),
        Err(Error::Host(_))
    ));
}

#[test]
fn test_env_and_clock() {
    let host = MemoryHost {
        env: HashMap::from([("HOME".to_string(), "/home/calx".to_string())]),
        clock: 1_700_000_000_000,
        ..MemoryHost::default()
    };
    let table = host_table(Arc::new(host));
    assert_eq!(
        table.call("get-env", &[Value::string("HOME")]).unwrap(),
        Value::string("/home/calx")
    );
    assert_eq!(
        table.call("get-env", &[Value::string("UNSET")]).unwrap(),
        Value::Nil
    );
    assert_eq!(
        table.call("now!", &[]).unwrap(),
        Value::number(1_700_000_000_000.0)
    );
}

#[test]
fn test_argument_checks() {
    let table = host_table(Arc::new(MemoryHost::default()));
    assert!(matches!(
        table.call("get-env", &[Value::tag("HOME")]),
        Err(Error::TypeMismatch { op: "get-env", .. })
    ));
    assert!(matches!(
        table.call("quit!", &[Value::number(1.5)]),
        Err(Error::TypeMismatch { op: "quit!", .. })
    ));
    assert!(matches!(table.call("now!", &[Value::Nil]), Err(Error::Arity { .. })));
}

#[test]
#[should_panic(expected = "host exit 3")]
fn test_quit_goes_through_host() {
    let table = host_table(Arc::new(MemoryHost::default()));
    let _ = table.call("quit!", &[Value::number(3.0)]);
}
