//! Transform decorator
//!
//! Maps items one-to-one after their bookmarks are fixed, so page sizes and
//! positions are those of the inner collection.

use super::types::Collection;
use crate::bookmark::Bookmark;
use crate::error::Result;
use crate::pager::Pager;
use std::fmt;

/// Collection mapping every item of an inner collection
pub struct Transform<C, F> {
    inner: C,
    transform: F,
}

impl<C, F> Transform<C, F> {
    /// Create a transform
    pub fn new(inner: C, transform: F) -> Self {
        Self { inner, transform }
    }

    /// The wrapped collection
    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: fmt::Debug, F> fmt::Debug for Transform<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<C, F, U> Collection for Transform<C, F>
where
    C: Collection,
    F: Fn(C::Item) -> U + Send + Sync,
{
    type Item = U;

    fn execute_pager(&self, pager: &mut Pager<U>) -> Result<()> {
        let mut sub = Pager::with_bookmark(pager.per_page(), pager.current_bookmark().cloned())?;
        self.inner.execute_pager(&mut sub)?;

        let sub_has_more = sub.has_more();
        let sub_next = sub.next_bookmark().cloned();
        for (item, bookmark) in sub.into_entries() {
            pager.push_with_bookmark((self.transform)(item), bookmark);
        }
        if sub_has_more {
            pager.mark_has_more();
            pager.set_next_bookmark(sub_next);
        }
        Ok(())
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        self.inner.validate(bookmark)
    }
}
