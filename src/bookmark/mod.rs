//! Bookmark module
//!
//! Bookmarks are ordered cursor values derived from an item's sort key(s).
//! They travel to clients as opaque page tokens.
//!
//! # Overview
//!
//! - `Bookmark` - the tagged, totally ordered cursor value
//! - `MergePosition` - one sub-collection's cursor inside a merged bookmark
//! - `PageToken` - the opaque wire form of a bookmark
//! - `encode` / `decode` - the token codec; decoding never fails loudly

mod codec;
mod types;

pub use codec::{decode, encode, PageToken, BOOKMARK_PREFIX};
pub use types::{Bookmark, MergePosition};
