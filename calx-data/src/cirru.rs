// calx-data - Cirru wire trees
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! The Cirru tree is the wire format for EDN data: every node is either a
//! text leaf or an ordered list of nodes. The same type backs quoted code
//! values.

use std::fmt;
use std::sync::Arc;

/// A node of a Cirru tree.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cirru {
    Leaf(Arc<str>),
    List(Vec<Cirru>),
}

impl Cirru {
    pub fn leaf(s: impl Into<Arc<str>>) -> Self {
        Cirru::Leaf(s.into())
    }

    pub fn list(items: Vec<Cirru>) -> Self {
        Cirru::List(items)
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Cirru::Leaf(s) => Some(s),
            Cirru::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Cirru]> {
        match self {
            Cirru::Leaf(_) => None,
            Cirru::List(items) => Some(items),
        }
    }
}

impl From<&str> for Cirru {
    fn from(s: &str) -> Self {
        Cirru::Leaf(Arc::from(s))
    }
}

impl From<String> for Cirru {
    fn from(s: String) -> Self {
        Cirru::Leaf(Arc::from(s))
    }
}

impl From<Vec<Cirru>> for Cirru {
    fn from(items: Vec<Cirru>) -> Self {
        Cirru::List(items)
    }
}

/// Whether a leaf must be quoted to survive a print and re-read.
pub(crate) fn needs_quote(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\\' | ','))
}

pub(crate) fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

impl fmt::Display for Cirru {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cirru::Leaf(s) if needs_quote(s) => write_quoted(f, s),
            Cirru::Leaf(s) => f.write_str(s),
            Cirru::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}
