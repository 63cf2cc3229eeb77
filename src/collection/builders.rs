//! Constructor helpers
//!
//! Short forms for assembling collection chains:
//!
//! ```rust,ignore
//! let users = wrap_items(SimpleBookmarker::new("id"), records)?;
//! let active = filter(users, |user| user["active"] == true);
//! let page = active.paginate(&PageRequest::per_page(20))?;
//! ```

use super::concat::Concat;
use super::filter::{Filter, FilterOptions};
use super::merge::Merge;
use super::proxy::{Fetch, Proxy};
use super::transform::Transform;
use super::types::{BoxedCollection, Collection};
use crate::bookmarker::Bookmarker;
use crate::error::Result;
use crate::source::VecSource;
use std::sync::Arc;

/// Wrap an ordered-source fetch callback
pub fn wrap<T>(
    bookmarker: impl Bookmarker<T> + 'static,
    fetch: impl Fetch<T> + 'static,
) -> Proxy<T> {
    Proxy::new(bookmarker, fetch)
}

/// Wrap an in-memory list, ordered by the bookmarker
pub fn wrap_items<T>(bookmarker: impl Bookmarker<T> + 'static, items: Vec<T>) -> Result<Proxy<T>>
where
    T: Clone + Send + Sync + 'static,
{
    let bookmarker: Arc<dyn Bookmarker<T>> = Arc::new(bookmarker);
    let source = VecSource::new(items, Arc::clone(&bookmarker))?;
    Ok(Proxy::with_shared(bookmarker, source))
}

/// Keep items matching the predicate (async mode)
pub fn filter<C, P>(collection: C, predicate: P) -> Filter<C, P>
where
    C: Collection,
    P: Fn(&C::Item) -> bool + Send + Sync,
{
    Filter::new(collection, predicate)
}

/// Keep items matching the predicate, one inner page per outer page
pub fn filter_sync<C, P>(collection: C, predicate: P) -> Filter<C, P>
where
    C: Collection,
    P: Fn(&C::Item) -> bool + Send + Sync,
{
    Filter::with_options(collection, predicate, FilterOptions::sync())
}

/// Map every item one-to-one
pub fn transform<C, F, U>(collection: C, transform: F) -> Transform<C, F>
where
    C: Collection,
    F: Fn(C::Item) -> U + Send + Sync,
{
    Transform::new(collection, transform)
}

/// Consume labelled collections one after another
pub fn concat<T, S: Into<String>>(sources: Vec<(S, BoxedCollection<T>)>) -> Result<Concat<T>> {
    Concat::new(sources)
}

/// Interleave labelled collections by ascending bookmark
pub fn merge<T, S: Into<String>>(sources: Vec<(S, BoxedCollection<T>)>) -> Result<Merge<T>> {
    Merge::new(sources)
}
