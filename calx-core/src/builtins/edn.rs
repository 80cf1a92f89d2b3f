// calx-core - EDN built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Conversion between values and quoted Cirru EDN trees.

use calx_data::{Error, Result, Value};
use calx_edn::{decode, encode};

use super::check_arity;

/// (to-cirru-edn x) - Canonical wire tree of x, as quoted code
pub(crate) fn builtin_to_cirru_edn(args: &[Value]) -> Result<Value> {
    check_arity("to-cirru-edn", args, 1)?;
    Ok(Value::CirruQuote(encode(&args[0])?))
}

/// (extract-cirru-edn quoted) - Value described by a quoted wire tree
pub(crate) fn builtin_extract_cirru_edn(args: &[Value]) -> Result<Value> {
    check_arity("extract-cirru-edn", args, 1)?;
    match &args[0] {
        Value::CirruQuote(tree) => decode(tree),
        other => Err(Error::type_mismatch(
            "extract-cirru-edn",
            "quote",
            other.type_name(),
        )),
    }
}
