// calx-edn - Encoding values to Cirru trees
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Value to wire-tree encoding.

use std::cmp::Ordering;

use calx_data::{Cirru, Error, Result, Value, compare, format_number, is_literal};

/// Encode a value as a Cirru tree.
///
/// Functions, recur markers and non-finite numbers have no wire form and
/// fail with [`Error::Unencodable`].
///
/// A ref encodes as `(atom value)`, which carries its current value but not
/// its registry path. Decoding it creates a new ref, so `decode(encode(v))`
/// equals `v` only when `v` contains no refs.
pub fn encode(value: &Value) -> Result<Cirru> {
    match value {
        Value::Nil => Ok(Cirru::leaf("nil")),
        Value::Bool(b) => Ok(Cirru::leaf(b.to_string())),
        Value::Number(n) if n.is_finite() => Ok(Cirru::leaf(format_number(*n))),
        Value::Str(s) => Ok(Cirru::leaf(format!("|{s}"))),
        Value::Tag(t) => Ok(Cirru::leaf(t.to_string())),
        Value::Symbol(s) => Ok(Cirru::leaf(s.to_string())),
        Value::List(l) => {
            let mut items = Vec::with_capacity(l.len() + 1);
            items.push(Cirru::leaf("[]"));
            for item in l.iter() {
                items.push(encode(&item)?);
            }
            Ok(Cirru::List(items))
        }
        Value::Map(m) => {
            let mut entries: Vec<(&Value, &Value)> = m.iter().collect();
            entries.sort_by(|a, b| literal_first(a.1, b.1).then_with(|| compare(a.0, b.0)));
            let mut items = vec![Cirru::leaf("{}")];
            for (k, v) in entries {
                items.push(Cirru::List(vec![encode(k)?, encode(v)?]));
            }
            Ok(Cirru::List(items))
        }
        Value::Set(s) => {
            let mut elements: Vec<&Value> = s.iter().collect();
            elements.sort();
            let mut items = vec![Cirru::leaf("#{}")];
            for element in elements {
                items.push(encode(element)?);
            }
            Ok(Cirru::List(items))
        }
        Value::Record(r) => {
            let mut entries: Vec<_> = r.iter().collect();
            entries.sort_by(|a, b| literal_first(a.1, b.1).then_with(|| a.0.cmp(b.0)));
            let mut items = vec![Cirru::leaf("%{}"), Cirru::leaf(r.name().to_string())];
            for (field, v) in entries {
                items.push(Cirru::List(vec![
                    Cirru::leaf(field.to_string()),
                    encode(v)?,
                ]));
            }
            Ok(Cirru::List(items))
        }
        Value::Tuple(t) => {
            let mut items = vec![Cirru::leaf("::"), encode(t.tag())?];
            for item in t.extra() {
                items.push(encode(item)?);
            }
            Ok(Cirru::List(items))
        }
        Value::CirruQuote(c) => Ok(Cirru::List(vec![Cirru::leaf("quote"), c.clone()])),
        Value::Ref(r) => Ok(Cirru::List(vec![Cirru::leaf("atom"), encode(&r.value())?])),
        Value::Number(_) | Value::Fn(_) | Value::Recur(_) => Err(Error::Unencodable {
            type_name: value.type_name(),
            value: value.to_string(),
        }),
    }
}

/// Entries with literal values sort before entries with composite values.
fn literal_first(a: &Value, b: &Value) -> Ordering {
    is_literal(b).cmp(&is_literal(a))
}
