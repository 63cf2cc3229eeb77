//! Bookmarker module
//!
//! A bookmarker is the per-collection strategy that derives an item's
//! bookmark and checks that a decoded bookmark has the expected shape.
//!
//! # Overview
//!
//! - `SimpleBookmarker` - one sortable field of a JSON record
//! - `CompositeBookmarker` - several fields, compared as a tuple
//! - `KeyBookmarker` - closure-based key for typed items

mod strategies;
mod types;

pub use strategies::{CompositeBookmarker, KeyBookmarker, SimpleBookmarker};
pub use types::{extract_field, json_to_bookmark, Bookmarker, FieldKind, SortField};
