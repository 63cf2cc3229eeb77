//! Pager types
//!
//! Items and their bookmarks are stored side by side. Ordered sources only
//! push items; the collection assigns bookmarks after each fetch, and
//! decorators move items together with the bookmark they were fetched at.

use crate::bookmark::{Bookmark, PageToken};
use crate::error::{Error, Result};
use serde::Serialize;

/// Per-request page accumulator and result
#[derive(Debug, Clone)]
pub struct Pager<T> {
    per_page: usize,
    items: Vec<T>,
    bookmarks: Vec<Bookmark>,
    has_more: bool,
    current_bookmark: Option<Bookmark>,
    resume_at: Option<Bookmark>,
}

impl<T> Pager<T> {
    /// Create a pager starting at the beginning of the collection
    pub fn new(per_page: usize) -> Result<Self> {
        Self::with_bookmark(per_page, None)
    }

    /// Create a pager resuming after the given bookmark
    pub fn with_bookmark(per_page: usize, current_bookmark: Option<Bookmark>) -> Result<Self> {
        if per_page == 0 {
            return Err(Error::InvalidPerPage);
        }
        Ok(Self {
            per_page,
            items: Vec::with_capacity(per_page.min(1024)),
            bookmarks: Vec::new(),
            has_more: false,
            current_bookmark,
            resume_at: None,
        })
    }

    // ========================================================================
    // Request state
    // ========================================================================

    /// Requested page size
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Bookmark this page starts after (`None` = start of the collection)
    pub fn current_bookmark(&self) -> Option<&Bookmark> {
        self.current_bookmark.as_ref()
    }

    /// Token of the bookmark this page starts after
    pub fn current_page(&self) -> Option<PageToken> {
        self.current_bookmark.as_ref().map(PageToken::encode)
    }

    /// Absolute counts are not available with cursor pagination
    pub fn total_entries(&self) -> Option<u64> {
        None
    }

    // ========================================================================
    // Filling the page
    // ========================================================================

    /// Append an item
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Append several items
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    /// Replace all items
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.bookmarks.clear();
    }

    /// Record that the source holds items beyond this page
    pub fn mark_has_more(&mut self) {
        self.has_more = true;
    }

    /// Number of items still missing from a full page
    pub fn remaining(&self) -> usize {
        self.per_page.saturating_sub(self.items.len())
    }

    /// Check if the page holds `per_page` items
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.per_page
    }

    // ========================================================================
    // Results
    // ========================================================================

    /// Items collected so far, in source order
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Iterate over the items
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the source holds more items after this page
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Bookmark the next page resumes after
    ///
    /// Only set while `has_more` is true: an explicit resume position when a
    /// decorator recorded one, else the last item's bookmark, else the
    /// bookmark this page started after.
    pub fn next_bookmark(&self) -> Option<&Bookmark> {
        if !self.has_more {
            return None;
        }
        self.resume_at
            .as_ref()
            .or_else(|| self.bookmarks.last())
            .or(self.current_bookmark.as_ref())
    }

    /// Token for the next page
    pub fn next_page(&self) -> Option<PageToken> {
        self.next_bookmark().map(PageToken::encode)
    }

    /// Encode any bookmark into a page token
    pub fn bookmark_to_page(&self, bookmark: &Bookmark) -> PageToken {
        PageToken::encode(bookmark)
    }

    /// Consume the pager, returning its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Transform every item, keeping bookmarks and paging state
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Pager<U> {
        Pager {
            per_page: self.per_page,
            items: self.items.into_iter().map(f).collect(),
            bookmarks: self.bookmarks,
            has_more: self.has_more,
            current_bookmark: self.current_bookmark,
            resume_at: self.resume_at,
        }
    }

    /// Serializable view for API responses
    pub fn summary(&self) -> PageSummary<'_, T> {
        PageSummary {
            items: &self.items,
            current_bookmark: self.current_bookmark.as_ref(),
            next_bookmark: self.next_bookmark(),
            next_page: self.next_page(),
        }
    }

    // ========================================================================
    // Collection internals
    // ========================================================================

    /// Append an item whose bookmark is already known
    pub(crate) fn push_with_bookmark(&mut self, item: T, bookmark: Bookmark) {
        self.items.push(item);
        self.bookmarks.push(bookmark);
    }

    /// Fix the position the next page resumes after
    pub(crate) fn set_next_bookmark(&mut self, bookmark: Option<Bookmark>) {
        self.resume_at = bookmark;
    }

    /// Drop items beyond `per_page`; an overflowing fetch means more remain
    pub(crate) fn truncate_to_page(&mut self) -> bool {
        if self.items.len() <= self.per_page {
            return false;
        }
        self.items.truncate(self.per_page);
        self.bookmarks.truncate(self.per_page);
        self.has_more = true;
        true
    }

    /// Compute bookmarks for items pushed by an ordered source
    pub(crate) fn assign_bookmarks(
        &mut self,
        bookmark_for: impl Fn(&T) -> Result<Bookmark>,
    ) -> Result<()> {
        self.bookmarks.truncate(self.items.len());
        for item in &self.items[self.bookmarks.len()..] {
            self.bookmarks.push(bookmark_for(item)?);
        }
        Ok(())
    }

    /// Consume the pager into `(item, bookmark)` pairs
    pub(crate) fn into_entries(self) -> Vec<(T, Bookmark)> {
        self.items.into_iter().zip(self.bookmarks).collect()
    }
}

impl<T> IntoIterator for Pager<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Pager<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Serializable view of a finished page
#[derive(Debug, Serialize)]
pub struct PageSummary<'a, T> {
    /// Items in source order
    pub items: &'a [T],
    /// Bookmark the page started after
    pub current_bookmark: Option<&'a Bookmark>,
    /// Bookmark the next page resumes after
    pub next_bookmark: Option<&'a Bookmark>,
    /// Token for the next page
    pub next_page: Option<PageToken>,
}
