//! Base collection over an ordered source

use super::types::Collection;
use crate::bookmark::Bookmark;
use crate::bookmarker::Bookmarker;
use crate::error::Result;
use crate::pager::Pager;
use std::fmt;
use std::sync::Arc;

/// Ordered-source fetch callback
///
/// Given a pager with `per_page` and `current_bookmark` set, push up to
/// `per_page` items whose bookmark is strictly after `current_bookmark`
/// and call `mark_has_more` if further items exist. Returning one extra
/// item instead of calling `mark_has_more` is also accepted.
pub trait Fetch<T>: Send + Sync {
    /// Fill the pager from the source
    fn fetch(&self, pager: &mut Pager<T>) -> Result<()>;
}

impl<T, F> Fetch<T> for F
where
    F: Fn(&mut Pager<T>) -> Result<()> + Send + Sync,
{
    fn fetch(&self, pager: &mut Pager<T>) -> Result<()> {
        self(pager)
    }
}

/// Collection pairing a bookmarker with a fetch callback
pub struct Proxy<T> {
    bookmarker: Arc<dyn Bookmarker<T>>,
    fetch: Box<dyn Fetch<T>>,
}

impl<T> Proxy<T> {
    /// Create a proxy
    pub fn new(
        bookmarker: impl Bookmarker<T> + 'static,
        fetch: impl Fetch<T> + 'static,
    ) -> Self {
        Self {
            bookmarker: Arc::new(bookmarker),
            fetch: Box::new(fetch),
        }
    }

    /// Create a proxy with a shared bookmarker
    pub fn with_shared(
        bookmarker: Arc<dyn Bookmarker<T>>,
        fetch: impl Fetch<T> + 'static,
    ) -> Self {
        Self {
            bookmarker,
            fetch: Box::new(fetch),
        }
    }

    /// The collection's bookmarker
    pub fn bookmarker(&self) -> &Arc<dyn Bookmarker<T>> {
        &self.bookmarker
    }
}

impl<T> fmt::Debug for Proxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy").finish_non_exhaustive()
    }
}

impl<T> Collection for Proxy<T> {
    type Item = T;

    /// Runs the fetch callback exactly once
    fn execute_pager(&self, pager: &mut Pager<T>) -> Result<()> {
        self.fetch.fetch(pager)?;

        if pager.truncate_to_page() {
            tracing::trace!(
                per_page = pager.per_page(),
                "Source returned more than per_page items; dropped the overflow"
            );
        }

        pager.assign_bookmarks(|item| self.bookmarker.bookmark_for(item))
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        self.bookmarker.validate(bookmark)
    }
}
