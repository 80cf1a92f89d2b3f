// calx-core - Method dispatch built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Method operations: &invoke, &methods-of

use calx_data::{Error, Result, Value, field_tag};

use super::check_arity;
use crate::dispatch::{invoke, method_names};

/// (&invoke obj method & args) - Call a method from obj's implementation tables
pub(crate) fn builtin_invoke(args: &[Value]) -> Result<Value> {
    if args.len() < 2 {
        return Err(Error::arity("&invoke", 2, args.len()));
    }
    let method = field_tag("&invoke", &args[1])?;
    invoke(&args[0], method.name(), &args[2..])
}

/// (&methods-of obj) - Sorted method names reachable from obj, as tags
pub(crate) fn builtin_methods_of(args: &[Value]) -> Result<Value> {
    check_arity("&methods-of", args, 1)?;
    Ok(Value::list(
        method_names(&args[0]).iter().map(|m| Value::tag(m)).collect(),
    ))
}
