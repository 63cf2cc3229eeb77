//! Concat decorator
//!
//! Consumes labelled sub-collections in sequence: the first is exhausted
//! before the second begins. Bookmarks record the active label plus that
//! sub-collection's own bookmark.

use super::types::{BoxedCollection, Collection};
use crate::bookmark::Bookmark;
use crate::error::{Error, Result};
use crate::pager::Pager;
use std::collections::HashSet;
use std::fmt;

/// Collection concatenating labelled sub-collections
pub struct Concat<T> {
    sources: Vec<(String, BoxedCollection<T>)>,
}

impl<T> Concat<T> {
    /// Create a concatenation; labels must be unique and non-empty
    pub fn new<S: Into<String>>(sources: Vec<(S, BoxedCollection<T>)>) -> Result<Self> {
        let sources: Vec<(String, BoxedCollection<T>)> = sources
            .into_iter()
            .map(|(label, collection)| (label.into(), collection))
            .collect();
        check_labels("concat", sources.iter().map(|(label, _)| label.as_str()))?;
        Ok(Self { sources })
    }

    /// Sub-collection labels in consumption order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(label, _)| label.as_str())
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        self.sources.iter().position(|(l, _)| l == label)
    }
}

impl<T> fmt::Debug for Concat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Concat")
            .field("sources", &self.labels().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> Collection for Concat<T> {
    type Item = T;

    fn execute_pager(&self, pager: &mut Pager<T>) -> Result<()> {
        let (start, mut position) = match pager.current_bookmark() {
            Some(Bookmark::Concat { source, position }) => (
                self.index_of(source).unwrap_or(0),
                position.as_deref().cloned(),
            ),
            _ => (0, None),
        };

        for (index, (label, collection)) in self.sources.iter().enumerate().skip(start) {
            let mut sub = Pager::with_bookmark(pager.remaining(), position.take())?;
            collection.execute_pager(&mut sub)?;

            let sub_has_more = sub.has_more();
            let sub_next = sub.next_bookmark().cloned();
            tracing::trace!(source = %label, fetched = sub.len(), sub_has_more, "Concat source");

            for (item, bookmark) in sub.into_entries() {
                pager.push_with_bookmark(item, Bookmark::concat(label, Some(bookmark)));
            }

            if sub_has_more {
                pager.mark_has_more();
                pager.set_next_bookmark(sub_next.map(|next| Bookmark::concat(label, Some(next))));
                return Ok(());
            }

            if pager.is_full() {
                if let Some((next_label, _)) = self.sources.get(index + 1) {
                    pager.mark_has_more();
                    pager.set_next_bookmark(Some(Bookmark::concat(next_label, None)));
                }
                return Ok(());
            }
        }

        Ok(())
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        let Bookmark::Concat { source, position } = bookmark else {
            return false;
        };
        let Some(index) = self.index_of(source) else {
            return false;
        };
        position
            .as_deref()
            .map_or(true, |position| self.sources[index].1.validate(position))
    }
}

/// Reject empty, blank or duplicate sub-collection labels
pub(super) fn check_labels<'a>(kind: &str, labels: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for label in labels {
        if label.is_empty() {
            return Err(Error::config(format!("{kind} source labels cannot be empty")));
        }
        if !seen.insert(label) {
            return Err(Error::config(format!(
                "{kind} source label '{label}' is used more than once"
            )));
        }
    }
    if seen.is_empty() {
        return Err(Error::config(format!(
            "{kind} needs at least one collection"
        )));
    }
    Ok(())
}
