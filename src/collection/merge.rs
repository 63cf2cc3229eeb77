//! Merge decorator
//!
//! Interleaves labelled sub-collections that share one total order. Each
//! step emits the smallest (or, descending, largest) next item by bookmark
//! and advances only that sub-collection's cursor. Ties go to the
//! sub-collection listed first.

use super::concat::check_labels;
use super::types::{BoxedCollection, Collection};
use crate::bookmark::{Bookmark, MergePosition};
use crate::error::Result;
use crate::pager::Pager;
use crate::types::SortDirection;
use std::cmp::Ordering;
use std::collections::VecDeque;
use std::fmt;

/// Collection merging labelled sub-collections by bookmark order
pub struct Merge<T> {
    sources: Vec<(String, BoxedCollection<T>)>,
    direction: SortDirection,
}

/// One sub-collection's fetched page during a merge
struct Lane<T> {
    buffer: VecDeque<(T, Bookmark)>,
    has_more: bool,
    resume_at: Option<Bookmark>,
}

impl<T> Merge<T> {
    /// Create an ascending merge; labels must be unique and non-empty
    pub fn new<S: Into<String>>(sources: Vec<(S, BoxedCollection<T>)>) -> Result<Self> {
        let sources: Vec<(String, BoxedCollection<T>)> = sources
            .into_iter()
            .map(|(label, collection)| (label.into(), collection))
            .collect();
        check_labels("merge", sources.iter().map(|(label, _)| label.as_str()))?;
        Ok(Self {
            sources,
            direction: SortDirection::Ascending,
        })
    }

    /// Set the shared order direction
    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Shared order direction
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Sub-collection labels in tie-break priority order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(label, _)| label.as_str())
    }

    /// Per-source cursors decoded from the current bookmark
    fn positions(&self, current: Option<&Bookmark>) -> Vec<Option<Bookmark>> {
        let known: &[MergePosition] = match current {
            Some(Bookmark::Merge(positions)) => positions,
            _ => &[],
        };
        self.sources
            .iter()
            .map(|(label, _)| {
                known
                    .iter()
                    .find(|p| &p.source == label)
                    .and_then(|p| p.position.clone())
            })
            .collect()
    }

    fn snapshot(&self, positions: &[Option<Bookmark>]) -> Bookmark {
        Bookmark::Merge(
            self.sources
                .iter()
                .zip(positions)
                .map(|((label, _), position)| MergePosition::new(label, position.clone()))
                .collect(),
        )
    }

    /// Lane holding the next item in merged order
    ///
    /// `None` when all lanes are drained, or when a drained lane still has
    /// unseen items: its next item is unknown, so nothing can be emitted.
    fn pick(&self, lanes: &[Lane<T>]) -> Option<usize> {
        let mut best: Option<(usize, &Bookmark)> = None;
        for (index, lane) in lanes.iter().enumerate() {
            let Some((_, bookmark)) = lane.buffer.front() else {
                if lane.has_more {
                    return None;
                }
                continue;
            };
            let better = match best {
                None => true,
                Some((_, current)) => self.direction.apply(bookmark.cmp(current)) == Ordering::Less,
            };
            if better {
                best = Some((index, bookmark));
            }
        }
        best.map(|(index, _)| index)
    }
}

impl<T> fmt::Debug for Merge<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merge")
            .field("sources", &self.labels().collect::<Vec<_>>())
            .field("direction", &self.direction)
            .finish()
    }
}

impl<T> Collection for Merge<T> {
    type Item = T;

    fn execute_pager(&self, pager: &mut Pager<T>) -> Result<()> {
        let mut positions = self.positions(pager.current_bookmark());

        let mut lanes = Vec::with_capacity(self.sources.len());
        for ((label, collection), position) in self.sources.iter().zip(&positions) {
            let mut sub = Pager::with_bookmark(pager.per_page(), position.clone())?;
            collection.execute_pager(&mut sub)?;
            tracing::trace!(source = %label, fetched = sub.len(), has_more = sub.has_more(), "Merge source");

            lanes.push(Lane {
                has_more: sub.has_more(),
                resume_at: sub.next_bookmark().cloned(),
                buffer: sub.into_entries().into(),
            });
        }

        while !pager.is_full() {
            let Some(index) = self.pick(&lanes) else {
                break;
            };
            let Some((item, bookmark)) = lanes[index].buffer.pop_front() else {
                break;
            };
            positions[index] = Some(bookmark);
            pager.push_with_bookmark(item, self.snapshot(&positions));
        }

        if lanes.iter().any(|lane| lane.has_more || !lane.buffer.is_empty()) {
            for (position, lane) in positions.iter_mut().zip(&lanes) {
                if lane.buffer.is_empty() && lane.has_more {
                    position.clone_from(&lane.resume_at);
                }
            }
            pager.mark_has_more();
            pager.set_next_bookmark(Some(self.snapshot(&positions)));
        }

        Ok(())
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        let Bookmark::Merge(positions) = bookmark else {
            return false;
        };
        positions.iter().all(|entry| {
            let Some((_, collection)) = self.sources.iter().find(|(l, _)| *l == entry.source) else {
                return false;
            };
            entry
                .position
                .as_ref()
                .map_or(true, |position| collection.validate(position))
        })
    }
}
