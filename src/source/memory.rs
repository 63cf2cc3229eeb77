//! In-memory ordered source

use crate::bookmark::Bookmark;
use crate::bookmarker::Bookmarker;
use crate::collection::Fetch;
use crate::error::Result;
use crate::pager::Pager;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Snapshot of items sorted by their bookmarks
pub struct VecSource<T> {
    entries: Vec<(T, Bookmark)>,
    bookmarker: Arc<dyn Bookmarker<T>>,
}

impl<T> VecSource<T> {
    /// Sort the items by the bookmarker's order
    pub fn new(items: Vec<T>, bookmarker: Arc<dyn Bookmarker<T>>) -> Result<Self> {
        let mut entries = items
            .into_iter()
            .map(|item| {
                let bookmark = bookmarker.bookmark_for(&item)?;
                Ok((item, bookmark))
            })
            .collect::<Result<Vec<_>>>()?;
        entries.sort_by(|(_, a), (_, b)| bookmarker.compare(a, b));
        Ok(Self {
            entries,
            bookmarker,
        })
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the source is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first item strictly after the bookmark
    fn start_after(&self, bookmark: Option<&Bookmark>) -> usize {
        match bookmark {
            Some(bookmark) => self.entries.partition_point(|(_, key)| {
                self.bookmarker.compare(key, bookmark) != Ordering::Greater
            }),
            None => 0,
        }
    }
}

impl<T> fmt::Debug for VecSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecSource")
            .field("len", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync> Fetch<T> for VecSource<T> {
    fn fetch(&self, pager: &mut Pager<T>) -> Result<()> {
        let start = self.start_after(pager.current_bookmark());
        let end = start.saturating_add(pager.per_page()).min(self.entries.len());

        pager.extend(self.entries[start..end].iter().map(|(item, _)| item.clone()));
        if end < self.entries.len() {
            pager.mark_has_more();
        }
        Ok(())
    }
}
