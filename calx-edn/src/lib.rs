// calx-edn - Cirru EDN codec for Calx values
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! # calx-edn
//!
//! Converts between runtime values and Cirru wire trees.
//!
//! ```text
//! ([] 1 2)                      list
//! ({} (:a 1) (:b |x))           map
//! (#{} 1 2)                     set
//! (%{} :point (:x 1) (:y 2))    record
//! (:: :ok 1)                    tuple
//! (quote (a b))                 quoted code
//! (atom 1)                      ref cell
//! ```
//!
//! Encoding is canonical: map and record entries and set elements are laid
//! out in a fixed order, so equal values encode to identical trees.

pub mod decode;
pub mod encode;

pub use decode::{DecodeOptions, decode, decode_with};
pub use encode::encode;
