//! Bookmarker strategy implementations
//!
//! Each strategy handles a specific kind of sort key.

use super::types::{Bookmarker, FieldKind, SortField};
use crate::bookmark::Bookmark;
use crate::error::Result;
use crate::types::{JsonValue, SortDirection};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

// ============================================================================
// Simple Bookmarker
// ============================================================================

/// Single-field bookmarker for JSON records
///
/// The default strategy: the bookmark is one declared sortable field,
/// typically a unique identifier.
#[derive(Debug, Clone)]
pub struct SimpleBookmarker {
    /// The sort field
    pub field: SortField,
}

impl SimpleBookmarker {
    /// Create a bookmarker over an integer identifier field
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: SortField::new(name, FieldKind::Integer),
        }
    }

    /// Create a bookmarker from a full field description
    pub fn with_field(field: SortField) -> Self {
        Self { field }
    }
}

impl Bookmarker<JsonValue> for SimpleBookmarker {
    fn bookmark_for(&self, item: &JsonValue) -> Result<Bookmark> {
        self.field.bookmark_for(item)
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        self.field.accepts(bookmark)
    }

    fn compare(&self, a: &Bookmark, b: &Bookmark) -> Ordering {
        self.field.direction.apply(a.cmp(b))
    }
}

// ============================================================================
// Composite Bookmarker
// ============================================================================

/// Multi-field bookmarker for JSON records
///
/// Bookmarks are `Bookmark::Tuple` values with one component per field.
/// Typical use is a non-unique sort key followed by a unique tie-breaker,
/// e.g. `(due_at, id)`.
#[derive(Debug, Clone)]
pub struct CompositeBookmarker {
    /// The sort fields, most significant first
    pub fields: Vec<SortField>,
}

impl CompositeBookmarker {
    /// Create a composite bookmarker
    pub fn new(fields: Vec<SortField>) -> Self {
        Self { fields }
    }
}

impl Bookmarker<JsonValue> for CompositeBookmarker {
    fn bookmark_for(&self, item: &JsonValue) -> Result<Bookmark> {
        let parts = self
            .fields
            .iter()
            .map(|field| field.bookmark_for(item))
            .collect::<Result<Vec<_>>>()?;
        Ok(Bookmark::Tuple(parts))
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        let Some(parts) = bookmark.as_tuple() else {
            return false;
        };
        parts.len() == self.fields.len()
            && self
                .fields
                .iter()
                .zip(parts)
                .all(|(field, part)| field.accepts(part))
    }

    fn compare(&self, a: &Bookmark, b: &Bookmark) -> Ordering {
        match (a.as_tuple(), b.as_tuple()) {
            (Some(left), Some(right)) => {
                for ((field, l), r) in self.fields.iter().zip(left).zip(right) {
                    let ordering = field.direction.apply(l.cmp(r));
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
                left.len().cmp(&right.len())
            }
            _ => a.cmp(b),
        }
    }
}

// ============================================================================
// Key Bookmarker
// ============================================================================

type Validator = Box<dyn Fn(&Bookmark) -> bool + Send + Sync>;

/// Closure-based bookmarker for typed items
///
/// The key's type is only known once an item is seen, so the default check
/// accepts any scalar or tuple. A decodable token of the wrong type is then
/// compared across types and can end the walk early. Use [`KeyBookmarker::with_kind`]
/// or [`KeyBookmarker::with_validator`] to restart on such tokens instead.
///
/// ```rust,ignore
/// let bookmarker = KeyBookmarker::new(|user: &User| Bookmark::from(user.id))
///     .with_kind(FieldKind::Integer);
/// ```
pub struct KeyBookmarker<T, F> {
    key: F,
    validator: Option<Validator>,
    direction: SortDirection,
    _item: PhantomData<fn(&T)>,
}

impl<T, F> KeyBookmarker<T, F>
where
    F: Fn(&T) -> Bookmark + Send + Sync,
{
    /// Create a bookmarker from a key function
    pub fn new(key: F) -> Self {
        Self {
            key,
            validator: None,
            direction: SortDirection::Ascending,
            _item: PhantomData,
        }
    }

    /// Replace the default shape check
    #[must_use]
    pub fn with_validator(
        mut self,
        validator: impl Fn(&Bookmark) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Accept only scalar bookmarks of the given kind
    #[must_use]
    pub fn with_kind(self, kind: FieldKind) -> Self {
        self.with_validator(move |bookmark| kind.accepts(bookmark))
    }

    /// Set the source direction
    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.direction = direction;
        self
    }
}

impl<T, F> fmt::Debug for KeyBookmarker<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBookmarker")
            .field("direction", &self.direction)
            .field("custom_validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

impl<T, F> Bookmarker<T> for KeyBookmarker<T, F>
where
    F: Fn(&T) -> Bookmark + Send + Sync,
{
    fn bookmark_for(&self, item: &T) -> Result<Bookmark> {
        Ok((self.key)(item))
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        match &self.validator {
            Some(validator) => validator(bookmark),
            None => bookmark.is_scalar() || matches!(bookmark, Bookmark::Tuple(_)),
        }
    }

    fn compare(&self, a: &Bookmark, b: &Bookmark) -> Ordering {
        self.direction.apply(a.cmp(b))
    }
}
