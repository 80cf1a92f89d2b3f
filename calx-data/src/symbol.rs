// calx-data - Symbol type
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Symbols are quoted identifiers, printed with a leading `'`.
//!
//! Unlike tags, symbols are not interned: they are compared by text.

use std::fmt;
use std::sync::Arc;

/// A quoted identifier.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Arc::from(name))
    }

    /// Parse a symbol from text like `'foo`. The leading quote is optional.
    pub fn parse(s: &str) -> Self {
        Symbol::new(s.strip_prefix('\'').unwrap_or(s))
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}", self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol('{})", self.0)
    }
}
