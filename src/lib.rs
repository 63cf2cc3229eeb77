// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Bookmarked Collection
//!
//! Cursor ("bookmark") pagination over ordered sources, with decorators that
//! keep the pagination contract when items are filtered, mapped, concatenated
//! or merged.
//!
//! ## Features
//!
//! - **Opaque page tokens**: `bookmark:` + URL-safe base64 of a typed bookmark
//! - **Stable under inserts**: pages resume strictly after a sort key, not an offset
//! - **Decorators**: Filter (async or sync), Transform, Concat, Merge
//! - **Sources**: in-memory lists, closures, DuckDB tables and queries
//! - **Definitions**: describe a collection in YAML and page it from the CLI
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bookmarked_collection::{wrap_items, Collection, CollectionExt, PageRequest, SimpleBookmarker};
//!
//! let users = wrap_items(SimpleBookmarker::new("id"), records)?
//!     .filter_items(|user| user["active"] == true);
//!
//! let page = users.paginate(&PageRequest::per_page(20))?;
//! for user in page.iter() {
//!     println!("{user}");
//! }
//!
//! if let Some(next) = page.next_page() {
//!     let page = users.paginate(&PageRequest::per_page(20).with_page(next))?;
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  paginate(page, per_page) → Pager { items, next_page }    │
//! └───────────────────────────────────────────────────────────┘
//!                              │
//! ┌──────────┬───────────┬─────┴─────┬───────────┬────────────┐
//! │  Filter  │ Transform │  Concat   │   Merge   │   Proxy    │
//! ├──────────┴───────────┴───────────┴───────────┼────────────┤
//! │ wrap inner collections                       │ Bookmarker │
//! │                                              │ + Fetch    │
//! └──────────────────────────────────────────────┴────────────┘
//!                              │
//!                ┌─────────────┴─────────────┐
//!                │ VecSource    │ SqlSource  │
//!                └───────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Bookmark values and page tokens
pub mod bookmark;

/// Bookmark strategies
pub mod bookmarker;

/// Page accumulator and result
pub mod pager;

/// Paginatable collections and decorators
pub mod collection;

/// Ordered sources
pub mod source;

/// YAML collection definitions
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use bookmark::{Bookmark, MergePosition, PageToken};
pub use bookmarker::{
    Bookmarker, CompositeBookmarker, FieldKind, KeyBookmarker, SimpleBookmarker, SortField,
};
pub use collection::{
    concat, filter, filter_sync, merge, transform, wrap, wrap_items, BoxedCollection, Collection,
    CollectionExt, Fetch, FilterMode, FilterOptions, PageRequest,
};
pub use config::{build_collection, load_definition, load_definition_from_str, CollectionDefinition};
pub use pager::Pager;
pub use source::{SqlBase, SqlSource, VecSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
