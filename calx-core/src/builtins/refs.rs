// calx-core - Ref built-in functions
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Ref operations: ref, defref, ref?, deref, reset!, add-watch, remove-watch

use calx_data::{Error, Ref, Result, Value, define_ref, field_tag, new_ref};

use super::check_arity;

fn expect_ref<'a>(op: &'static str, v: &'a Value) -> Result<&'a Ref> {
    v.as_ref_cell()
        .ok_or_else(|| Error::type_mismatch(op, "ref", v.type_name()))
}

// ============================================================================
// Creation and Predicate
// ============================================================================

/// (ref x) - Create a ref at a fresh path
pub(crate) fn builtin_ref(args: &[Value]) -> Result<Value> {
    check_arity("ref", args, 1)?;
    Ok(Value::Ref(new_ref(args[0].clone())))
}

/// (defref path x) - Ref at a named path; an existing ref keeps its value
pub(crate) fn builtin_defref(args: &[Value]) -> Result<Value> {
    check_arity("defref", args, 2)?;
    let path = match &args[0] {
        Value::Str(s) => s.to_string(),
        Value::Tag(t) => t.name().to_string(),
        Value::Symbol(s) => s.name().to_string(),
        other => {
            return Err(Error::type_mismatch(
                "defref",
                "string path",
                other.type_name(),
            ));
        }
    };
    Ok(Value::Ref(define_ref(&path, args[1].clone())))
}

/// (ref? x)
pub(crate) fn builtin_ref_p(args: &[Value]) -> Result<Value> {
    check_arity("ref?", args, 1)?;
    Ok(Value::Bool(matches!(args[0], Value::Ref(_))))
}

// ============================================================================
// Basic Operations
// ============================================================================

/// (deref r) - Current value
pub(crate) fn builtin_deref(args: &[Value]) -> Result<Value> {
    check_arity("deref", args, 1)?;
    Ok(expect_ref("deref", &args[0])?.value())
}

/// (reset! r x) - Store x, notify watchers, return x
pub(crate) fn builtin_reset(args: &[Value]) -> Result<Value> {
    check_arity("reset!", args, 2)?;
    expect_ref("reset!", &args[0])?.reset(args[1].clone())?;
    Ok(args[1].clone())
}

// ============================================================================
// Watches
// ============================================================================

/// (add-watch r key f) - f is called with (new old) after every reset
pub(crate) fn builtin_add_watch(args: &[Value]) -> Result<Value> {
    check_arity("add-watch", args, 3)?;
    let cell = expect_ref("add-watch", &args[0])?;
    let key = field_tag("add-watch", &args[1])?;
    let Value::Fn(f) = &args[2] else {
        return Err(Error::type_mismatch("add-watch", "fn", args[2].type_name()));
    };
    cell.add_watch(key, f.clone());
    Ok(args[0].clone())
}

/// (remove-watch r key)
pub(crate) fn builtin_remove_watch(args: &[Value]) -> Result<Value> {
    check_arity("remove-watch", args, 2)?;
    let cell = expect_ref("remove-watch", &args[0])?;
    cell.remove_watch(&field_tag("remove-watch", &args[1])?);
    Ok(args[0].clone())
}
