// calx-edn - Decoding Cirru trees to values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Wire-tree to value decoding.
//!
//! Decoding is strict by default: an unrecognised leaf is an error. The
//! permissive mode keeps such leaves as raw strings, which is what quoted
//! code coming out of macros needs.

use calx_data::{Cirru, Error, Record, Result, Symbol, Tag, Tuple, Value, new_ref};
use tracing::warn;

/// Decoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode unrecognised leaves as strings instead of failing.
    pub permissive_leaves: bool,
}

impl DecodeOptions {
    pub fn strict() -> Self {
        DecodeOptions {
            permissive_leaves: false,
        }
    }

    pub fn permissive() -> Self {
        DecodeOptions {
            permissive_leaves: true,
        }
    }
}

/// Decode a Cirru tree with strict leaf handling.
///
/// Every `(atom value)` node registers a new ref at a fresh path, so a
/// decoded ref never equals the ref that was encoded.
pub fn decode(node: &Cirru) -> Result<Value> {
    decode_with(node, DecodeOptions::default())
}

/// Decode a Cirru tree with the given options.
pub fn decode_with(node: &Cirru, opts: DecodeOptions) -> Result<Value> {
    match node {
        Cirru::Leaf(s) => decode_leaf(s, opts),
        Cirru::List(items) => decode_list(node, items, opts),
    }
}

fn decode_leaf(s: &str, opts: DecodeOptions) -> Result<Value> {
    match s {
        "nil" => return Ok(Value::Nil),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "" => return Err(Error::decode("\"\"", "empty leaf")),
        _ => {}
    }
    if let Some(text) = s.strip_prefix('|').or_else(|| s.strip_prefix('"')) {
        return Ok(Value::string(text));
    }
    if let Some(name) = s.strip_prefix(':') {
        return Ok(Value::Tag(Tag::new(name)));
    }
    if let Some(name) = s.strip_prefix('\'') {
        return Ok(Value::Symbol(Symbol::new(name)));
    }
    if looks_numeric(s) {
        if let Ok(n) = s.parse::<f64>() {
            if !n.is_finite() {
                return Err(Error::decode(s, "number out of range"));
            }
            return Ok(Value::Number(n));
        }
    }
    if opts.permissive_leaves {
        warn!(leaf = s, "undecodable leaf kept as string");
        Ok(Value::string(s))
    } else {
        Err(Error::decode(s, "unrecognised leaf"))
    }
}

/// Leading digit, optionally after a minus sign.
fn looks_numeric(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    digits.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn decode_list(node: &Cirru, items: &[Cirru], opts: DecodeOptions) -> Result<Value> {
    let Some((head, rest)) = items.split_first() else {
        return Err(Error::decode("()", "empty node"));
    };
    let Some(marker) = head.as_leaf() else {
        return Err(Error::decode(node.to_string(), "head must be a leaf"));
    };
    match marker {
        "[]" => Ok(Value::list(decode_all(rest, opts)?)),
        "#{}" => Ok(Value::set(decode_all(rest, opts)?)),
        "{}" => {
            let mut pairs = Vec::with_capacity(rest.len());
            for pair in rest {
                let (k, v) = expect_pair(node, pair)?;
                pairs.push((decode_with(k, opts)?, decode_with(v, opts)?));
            }
            Ok(Value::map(pairs))
        }
        "%{}" => decode_record(node, rest, opts),
        "::" => {
            let Some((tag, extra)) = rest.split_first() else {
                return Err(Error::decode(node.to_string(), "tuple needs a tag"));
            };
            Ok(Value::Tuple(Tuple::new(
                decode_with(tag, opts)?,
                decode_all(extra, opts)?,
            )))
        }
        "quote" => match rest {
            [code] => Ok(Value::CirruQuote(code.clone())),
            _ => Err(Error::decode(node.to_string(), "quote expects 1 argument")),
        },
        "atom" => match rest {
            [inner] => Ok(Value::Ref(new_ref(decode_with(inner, opts)?))),
            _ => Err(Error::decode(node.to_string(), "atom expects 1 argument")),
        },
        "do" => match rest {
            [inner] => decode_with(inner, opts),
            _ => Err(Error::decode(node.to_string(), "do expects 1 argument")),
        },
        other => Err(Error::decode(
            node.to_string(),
            format!("unknown head marker {other}"),
        )),
    }
}

fn decode_all(items: &[Cirru], opts: DecodeOptions) -> Result<Vec<Value>> {
    items.iter().map(|item| decode_with(item, opts)).collect()
}

fn expect_pair<'a>(node: &Cirru, pair: &'a Cirru) -> Result<(&'a Cirru, &'a Cirru)> {
    match pair.as_list() {
        Some([k, v]) => Ok((k, v)),
        _ => Err(Error::decode(
            node.to_string(),
            format!("expected a pair, got {pair}"),
        )),
    }
}

fn decode_record(node: &Cirru, rest: &[Cirru], opts: DecodeOptions) -> Result<Value> {
    let Some((name, entries)) = rest.split_first() else {
        return Err(Error::decode(node.to_string(), "record needs a name"));
    };
    let name = record_tag(node, name, "record name")?;
    let mut pairs = Vec::with_capacity(entries.len());
    for entry in entries {
        let (field, value) = expect_pair(node, entry)?;
        pairs.push((
            record_tag(node, field, "record field")?,
            decode_with(value, opts)?,
        ));
    }
    Ok(Value::Record(Record::new(name, pairs)?))
}

/// A `:tag` leaf in a record header or entry.
fn record_tag(node: &Cirru, leaf: &Cirru, what: &str) -> Result<Tag> {
    match leaf.as_leaf().and_then(|s| s.strip_prefix(':')) {
        Some(name) => Ok(Tag::new(name)),
        None => Err(Error::decode(
            node.to_string(),
            format!("{what} must be a tag, got {leaf}"),
        )),
    }
}
