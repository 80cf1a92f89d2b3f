// calx-data - Error types for the Calx value runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types shared by every Calx crate.

use thiserror::Error;

/// Result type for Calx value operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by value operations, the EDN codec and method dispatch.
///
/// Every error is terminal for the operation that raised it. Messages name
/// the operation, the offending value's type and, where one exists, the set
/// of valid alternatives.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Operation applied to a value of the wrong variant
    #[error("{op}: expected {expected}, got {got}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    /// Numeric index outside a list or tuple
    #[error("{op}: index {index} out of bounds for length {len}")]
    IndexError {
        op: &'static str,
        index: i64,
        len: usize,
    },
    /// Strict lookup of an absent key
    #[error("{op}: cannot find {key}{}", alternatives(.available))]
    MissingKey {
        op: &'static str,
        key: String,
        available: Vec<String>,
    },
    /// Record field not in the schema
    #[error("unknown field {field} for record {record}{}", alternatives(.available))]
    UnknownField {
        record: String,
        field: String,
        available: Vec<String>,
    },
    /// Repeated field name while building a record schema
    #[error("duplicate field {field} in {context}")]
    DuplicateField { context: String, field: String },
    /// No implementation table or method for `invoke`
    #[error("no method {method} for {value} (type {type_tag}){}", alternatives(.available))]
    DispatchError {
        method: String,
        value: String,
        type_tag: String,
        available: Vec<String>,
    },
    /// Malformed or unrecognised wire-tree node
    #[error("cannot decode {node}: {message}")]
    DecodeError { node: String, message: String },
    /// Value has no wire representation
    #[error("cannot encode {type_name} value {value}")]
    Unencodable {
        type_name: &'static str,
        value: String,
    },
    /// Wrong number of arguments to a native procedure
    #[error("wrong number of arguments to '{name}': expected {expected}, got {got}")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    /// Failure reported by a host capability (file, environment, clock)
    #[error("host error: {0}")]
    Host(String),
    /// Failure raised by a native function
    #[error("{0}")]
    Native(String),
}

fn alternatives(names: &[String]) -> String {
    if names.is_empty() {
        String::new()
    } else {
        format!(", available: {}", names.join(" "))
    }
}

impl Error {
    /// Create a type mismatch error.
    pub fn type_mismatch(op: &'static str, expected: &'static str, got: &'static str) -> Self {
        Error::TypeMismatch { op, expected, got }
    }

    /// Create an index error.
    pub fn index(op: &'static str, index: impl TryInto<i64>, len: usize) -> Self {
        Error::IndexError {
            op,
            index: index.try_into().unwrap_or(i64::MAX),
            len,
        }
    }

    /// Create a missing key error without alternatives.
    pub fn missing_key(op: &'static str, key: impl Into<String>) -> Self {
        Error::MissingKey {
            op,
            key: key.into(),
            available: Vec::new(),
        }
    }

    /// Create a decode error for a wire-tree node.
    pub fn decode(node: impl Into<String>, message: impl Into<String>) -> Self {
        Error::DecodeError {
            node: node.into(),
            message: message.into(),
        }
    }

    /// Create an arity error for a native procedure.
    pub fn arity(name: &'static str, expected: usize, got: usize) -> Self {
        Error::Arity {
            name,
            expected,
            got,
        }
    }

    /// Create a native function failure.
    pub fn native(message: impl Into<String>) -> Self {
        Error::Native(message.into())
    }
}
