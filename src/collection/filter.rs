//! Filter decorator
//!
//! Keeps only items matching a predicate while still returning full pages
//! whenever the inner collection has enough matching items left.

use super::types::Collection;
use crate::bookmark::Bookmark;
use crate::error::Result;
use crate::pager::Pager;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on inner fetches per outer page
pub const DEFAULT_MAX_ROUNDS: usize = 64;

/// Default cap on the inner page size used while filling a page
pub const DEFAULT_MAX_FETCH: usize = 1000;

/// How a filter consumes inner pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Keep fetching inner pages until the page is full or the source ends
    #[default]
    Async,
    /// Return the survivors of one inner page; repeat only on an empty page
    Sync,
}

/// Filter behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Consumption mode
    #[serde(default)]
    pub mode: FilterMode,

    /// Maximum inner fetches per outer page
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Largest inner page size the async mode grows to
    #[serde(default = "default_max_fetch")]
    pub max_fetch: usize,
}

fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}

fn default_max_fetch() -> usize {
    DEFAULT_MAX_FETCH
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            mode: FilterMode::Async,
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_fetch: DEFAULT_MAX_FETCH,
        }
    }
}

impl FilterOptions {
    /// Options for sync mode
    pub fn sync() -> Self {
        Self {
            mode: FilterMode::Sync,
            ..Default::default()
        }
    }

    /// Set the round guard
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    /// Set the inner page size cap
    #[must_use]
    pub fn with_max_fetch(mut self, max_fetch: usize) -> Self {
        self.max_fetch = max_fetch.max(1);
        self
    }
}

/// Collection keeping only items that match a predicate
pub struct Filter<C, P> {
    inner: C,
    predicate: P,
    options: FilterOptions,
}

impl<C, P> Filter<C, P>
where
    C: Collection,
    P: Fn(&C::Item) -> bool + Send + Sync,
{
    /// Create an async filter
    pub fn new(inner: C, predicate: P) -> Self {
        Self::with_options(inner, predicate, FilterOptions::default())
    }

    /// Create a filter with explicit options
    pub fn with_options(inner: C, predicate: P, options: FilterOptions) -> Self {
        Self {
            inner,
            predicate,
            options,
        }
    }

    /// Filter options
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// The wrapped collection
    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn execute_async(&self, pager: &mut Pager<C::Item>) -> Result<()> {
        let per_page = pager.per_page();
        let mut position = pager.current_bookmark().cloned();
        let mut fetch_size = per_page;

        for round in 0..self.options.max_rounds {
            let mut sub = Pager::with_bookmark(fetch_size, position.clone())?;
            self.inner.execute_pager(&mut sub)?;

            let sub_has_more = sub.has_more();
            let sub_next = sub.next_bookmark().cloned();
            tracing::trace!(round, fetched = sub.len(), sub_has_more, "Filter round");

            let mut entries = sub.into_entries().into_iter();
            while let Some((item, bookmark)) = entries.next() {
                if !(self.predicate)(&item) {
                    continue;
                }
                pager.push_with_bookmark(item, bookmark);

                if pager.is_full() {
                    if entries.any(|(rest, _)| (self.predicate)(&rest)) {
                        pager.mark_has_more();
                    } else if sub_has_more {
                        // Skip the rejected tail of this inner page
                        pager.mark_has_more();
                        pager.set_next_bookmark(sub_next);
                    }
                    return Ok(());
                }
            }

            if !sub_has_more {
                return Ok(());
            }

            position = sub_next;
            fetch_size = fetch_size
                .saturating_mul(2)
                .min(self.options.max_fetch.max(per_page));
        }

        tracing::warn!(
            max_rounds = self.options.max_rounds,
            items = pager.len(),
            "Filter reached its round limit; returning a short page"
        );
        pager.mark_has_more();
        pager.set_next_bookmark(position);
        Ok(())
    }

    fn execute_sync(&self, pager: &mut Pager<C::Item>) -> Result<()> {
        let mut position = pager.current_bookmark().cloned();

        for round in 0..self.options.max_rounds {
            let mut sub = Pager::with_bookmark(pager.per_page(), position.clone())?;
            self.inner.execute_pager(&mut sub)?;

            let sub_has_more = sub.has_more();
            let sub_next = sub.next_bookmark().cloned();
            tracing::trace!(round, fetched = sub.len(), sub_has_more, "Sync filter round");

            for (item, bookmark) in sub.into_entries() {
                if (self.predicate)(&item) {
                    pager.push_with_bookmark(item, bookmark);
                }
            }

            if !sub_has_more {
                return Ok(());
            }
            if !pager.is_empty() {
                pager.mark_has_more();
                pager.set_next_bookmark(sub_next);
                return Ok(());
            }

            position = sub_next;
        }

        tracing::warn!(
            max_rounds = self.options.max_rounds,
            "Sync filter reached its round limit with an empty page"
        );
        pager.mark_has_more();
        pager.set_next_bookmark(position);
        Ok(())
    }
}

impl<C, P> fmt::Debug for Filter<C, P>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("inner", &self.inner)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<C, P> Collection for Filter<C, P>
where
    C: Collection,
    P: Fn(&C::Item) -> bool + Send + Sync,
{
    type Item = C::Item;

    fn execute_pager(&self, pager: &mut Pager<C::Item>) -> Result<()> {
        match self.options.mode {
            FilterMode::Async => self.execute_async(pager),
            FilterMode::Sync => self.execute_sync(pager),
        }
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        self.inner.validate(bookmark)
    }
}
