//! Collection module
//!
//! Supports: Proxy (ordered source), Filter, Transform, Concat, Merge
//!
//! # Overview
//!
//! A collection is a paginatable source. The base `Proxy` pairs a bookmarker
//! with an ordered-source fetch callback; decorators wrap one or more inner
//! collections while keeping the pagination contract:
//!
//! ```text
//! paginate(token, per_page)
//!   └─ decode token ─ validate ─ Pager ─ execute_pager
//!        Filter / Transform / Concat / Merge
//!          └─ Proxy ─ fetch(pager) ─ bookmarks assigned
//! ```
//!
//! Collections hold configuration only; all per-request state lives in the
//! `Pager`.

mod builders;
mod concat;
mod filter;
mod merge;
mod proxy;
mod transform;
mod types;

pub use builders::{concat, filter, filter_sync, merge, transform, wrap, wrap_items};
pub use concat::Concat;
pub use filter::{Filter, FilterMode, FilterOptions, DEFAULT_MAX_FETCH, DEFAULT_MAX_ROUNDS};
pub use merge::Merge;
pub use proxy::{Fetch, Proxy};
pub use transform::Transform;
pub use types::{BoxedCollection, Collection, CollectionExt, PageRequest};
