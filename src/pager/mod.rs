//! Pager module
//!
//! A `Pager` is the mutable accumulator for one page fetch. It is created
//! fresh for each `paginate` call, filled by the ordered source (and any
//! decorators), and handed back to the caller as the page result.

mod types;

pub use types::{PageSummary, Pager};
