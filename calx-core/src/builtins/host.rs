// calx-core - Host built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Host operations: read-file, write-file, get-env, now!, quit!

use std::sync::Arc;

use calx_data::{Error, Result, Value};

use super::{NativeTable, check_arity};
use crate::host::Host;

fn expect_str<'a>(op: &'static str, v: &'a Value) -> Result<&'a str> {
    v.as_str()
        .ok_or_else(|| Error::type_mismatch(op, "string", v.type_name()))
}

pub(super) fn register(table: &mut NativeTable, host: Arc<dyn Host>) {
    // (read-file path) - Resource contents as a string
    let h = Arc::clone(&host);
    table.define_native("read-file", move |args| {
        check_arity("read-file", args, 1)?;
        let name = expect_str("read-file", &args[0])?;
        let bytes = h.read_resource(name)?;
        let text =
            String::from_utf8(bytes).map_err(|e| Error::Host(format!("read {name}: {e}")))?;
        Ok(Value::string(text))
    });

    // (write-file path content)
    let h = Arc::clone(&host);
    table.define_native("write-file", move |args| {
        check_arity("write-file", args, 2)?;
        let name = expect_str("write-file", &args[0])?;
        let content = expect_str("write-file", &args[1])?;
        h.write_resource(name, content.as_bytes())?;
        Ok(Value::Nil)
    });

    // (get-env name) - nil when unset
    let h = Arc::clone(&host);
    table.define_native("get-env", move |args| {
        check_arity("get-env", args, 1)?;
        let name = expect_str("get-env", &args[0])?;
        Ok(h.env_var(name).map_or(Value::Nil, Value::string))
    });

    // (now!) - Milliseconds since the epoch
    let h = Arc::clone(&host);
    table.define_native("now!", move |args| {
        check_arity("now!", args, 0)?;
        Ok(Value::number(h.now_millis() as f64))
    });

    // (quit! code)
    table.define_native("quit!", move |args| {
        check_arity("quit!", args, 1)?;
        match args[0].as_number() {
            Some(code) if code.fract() == 0.0 => host.exit(code as i32),
            _ => Err(Error::type_mismatch(
                "quit!",
                "integer exit code",
                args[0].type_name(),
            )),
        }
    });
}
