// calx-data - Persistent values for the Calx runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # calx-data
//!
//! Value model for the Calx runtime: persistent lists, maps and sets,
//! records, tuples, ref cells, and the structural hash, equality and total
//! order that tie them together.

pub mod access;
pub mod cirru;
pub mod equal;
pub mod error;
pub mod func;
pub mod hash;
pub mod list;
pub mod map;
pub mod order;
pub mod record;
pub mod reference;
pub mod set;
pub mod symbol;
pub mod tag;
pub mod tuple;
pub mod value;

pub use access::index_arg;
pub use cirru::Cirru;
pub use equal::values_equal;
pub use error::{Error, Result};
pub use func::{Function, NativeFn};
pub use hash::hash_value;
pub use list::{APPEND_START_LIMIT, List};
pub use map::{CHAIN_DEPTH_LIMIT, MAP_SLICE_LIMIT, MERGE_SLICE_LIMIT, Map};
pub use order::{compare, is_literal};
pub use record::{Record, field_tag};
pub use reference::{Ref, define_ref, fresh_ref_path, lookup_ref, new_ref, remove_ref};
pub use set::Set;
pub use symbol::Symbol;
pub use tag::Tag;
pub use tuple::Tuple;
pub use value::{TypeKey, Value, format_number};
