//! Collection types and traits
//!
//! Defines the core collection abstraction used by the proxy and all
//! decorators.

use super::filter::{Filter, FilterOptions};
use super::transform::Transform;
use crate::bookmark::{decode, Bookmark};
use crate::error::{Error, Result};
use crate::pager::Pager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A boxed collection, used where sub-collections of different types meet
pub type BoxedCollection<T> = Box<dyn Collection<Item = T>>;

/// Core trait for paginatable collections
pub trait Collection: Send + Sync {
    /// Item type yielded by the collection
    type Item;

    /// Fill the pager starting after its current bookmark
    ///
    /// Implementations add at most `per_page` items, each with its bookmark,
    /// and call `mark_has_more` when items remain beyond the page.
    fn execute_pager(&self, pager: &mut Pager<Self::Item>) -> Result<()>;

    /// Check that a decoded bookmark belongs to this collection
    fn validate(&self, bookmark: &Bookmark) -> bool;

    /// Fetch one page
    ///
    /// Fails only for a missing or zero `per_page`. A token that is
    /// malformed, or decodes to a bookmark this collection rejects, starts
    /// from the beginning. `total_entries` is ignored.
    fn paginate(&self, request: &PageRequest) -> Result<Pager<Self::Item>> {
        let per_page = request
            .per_page
            .filter(|n| *n > 0)
            .ok_or(Error::InvalidPerPage)?;

        if let Some(total_entries) = request.total_entries {
            tracing::debug!(
                total_entries,
                "Ignoring total_entries; bookmark pagination has no total count"
            );
        }

        let bookmark = request.page.as_deref().and_then(decode).filter(|bookmark| {
            let valid = self.validate(bookmark);
            if !valid {
                tracing::debug!(%bookmark, "Ignoring bookmark rejected by collection");
            }
            valid
        });

        let mut pager = Pager::with_bookmark(per_page, bookmark)?;
        self.execute_pager(&mut pager)?;

        tracing::debug!(
            items = pager.len(),
            has_more = pager.has_more(),
            "Paginated collection"
        );
        Ok(pager)
    }
}

impl<C: Collection + ?Sized> Collection for Box<C> {
    type Item = C::Item;

    fn execute_pager(&self, pager: &mut Pager<Self::Item>) -> Result<()> {
        (**self).execute_pager(pager)
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        (**self).validate(bookmark)
    }
}

impl<C: Collection + ?Sized> Collection for Arc<C> {
    type Item = C::Item;

    fn execute_pager(&self, pager: &mut Pager<Self::Item>) -> Result<()> {
        (**self).execute_pager(pager)
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        (**self).validate(bookmark)
    }
}

// ============================================================================
// Page Request
// ============================================================================

/// Parameters of one `paginate` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Opaque page token from a previous page (`None` = first page)
    #[serde(default)]
    pub page: Option<String>,

    /// Requested page size (required, positive)
    #[serde(default)]
    pub per_page: Option<usize>,

    /// Accepted for offset-pagination callers and ignored
    #[serde(default)]
    pub total_entries: Option<u64>,
}

impl PageRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a request for the first page
    pub fn per_page(per_page: usize) -> Self {
        Self {
            per_page: Some(per_page),
            ..Default::default()
        }
    }

    /// Resume from a page token
    #[must_use]
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    /// Resume from an optional page token
    #[must_use]
    pub fn with_page_opt(mut self, page: Option<impl Into<String>>) -> Self {
        self.page = page.map(Into::into);
        self
    }

    /// Set a total count (ignored by pagination)
    #[must_use]
    pub fn with_total_entries(mut self, total_entries: u64) -> Self {
        self.total_entries = Some(total_entries);
        self
    }
}

// ============================================================================
// Combinators
// ============================================================================

/// Decorator combinators available on every collection
pub trait CollectionExt: Collection + Sized {
    /// Keep only items matching the predicate, filling pages across inner pages
    fn filter_items<P>(self, predicate: P) -> Filter<Self, P>
    where
        P: Fn(&Self::Item) -> bool + Send + Sync,
    {
        Filter::new(self, predicate)
    }

    /// Keep only items matching the predicate, with explicit options
    fn filter_items_with<P>(self, predicate: P, options: FilterOptions) -> Filter<Self, P>
    where
        P: Fn(&Self::Item) -> bool + Send + Sync,
    {
        Filter::with_options(self, predicate, options)
    }

    /// Map every item one-to-one
    fn transform<F, U>(self, transform: F) -> Transform<Self, F>
    where
        F: Fn(Self::Item) -> U + Send + Sync,
    {
        Transform::new(self, transform)
    }

    /// Erase the concrete collection type
    fn boxed(self) -> BoxedCollection<Self::Item>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<C: Collection> CollectionExt for C {}
