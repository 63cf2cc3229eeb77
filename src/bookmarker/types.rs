//! Bookmarker types and traits
//!
//! Defines the core bookmarker abstraction and the sort field description
//! shared by the JSON-based strategies and the SQL source.

use crate::bookmark::Bookmark;
use crate::error::{Error, Result};
use crate::types::{JsonValue, SortDirection};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

/// Core trait for bookmark strategies
pub trait Bookmarker<T: ?Sized>: Send + Sync {
    /// Derive the bookmark of an item from its sort-relevant fields
    fn bookmark_for(&self, item: &T) -> Result<Bookmark>;

    /// Check that a decoded bookmark has the shape this collection produces
    fn validate(&self, bookmark: &Bookmark) -> bool;

    /// Compare two bookmarks in source order
    fn compare(&self, a: &Bookmark, b: &Bookmark) -> Ordering {
        a.cmp(b)
    }
}

impl<T: ?Sized, B: Bookmarker<T> + ?Sized> Bookmarker<T> for Arc<B> {
    fn bookmark_for(&self, item: &T) -> Result<Bookmark> {
        (**self).bookmark_for(item)
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        (**self).validate(bookmark)
    }

    fn compare(&self, a: &Bookmark, b: &Bookmark) -> Ordering {
        (**self).compare(a, b)
    }
}

impl<T: ?Sized, B: Bookmarker<T> + ?Sized> Bookmarker<T> for Box<B> {
    fn bookmark_for(&self, item: &T) -> Result<Bookmark> {
        (**self).bookmark_for(item)
    }

    fn validate(&self, bookmark: &Bookmark) -> bool {
        (**self).validate(bookmark)
    }

    fn compare(&self, a: &Bookmark, b: &Bookmark) -> Ordering {
        (**self).compare(a, b)
    }
}

// ============================================================================
// Sort Fields
// ============================================================================

/// Value type of a sort field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// 64-bit integer
    #[serde(alias = "int")]
    Integer,
    /// String
    #[serde(alias = "string")]
    Text,
    /// Boolean
    #[serde(alias = "bool")]
    Boolean,
    /// RFC 3339 string or epoch seconds
    #[serde(alias = "datetime")]
    Timestamp,
    /// Any scalar, inferred from the value
    #[default]
    Any,
}

impl FieldKind {
    /// Check if a non-null scalar bookmark matches this kind
    pub fn accepts(self, bookmark: &Bookmark) -> bool {
        match self {
            Self::Integer => matches!(bookmark, Bookmark::Int(_)),
            Self::Text => matches!(bookmark, Bookmark::Text(_)),
            Self::Boolean => matches!(bookmark, Bookmark::Bool(_)),
            Self::Timestamp => matches!(bookmark, Bookmark::Time(_)),
            Self::Any => bookmark.is_scalar() && !bookmark.is_null(),
        }
    }
}

/// A field an ordered source is sorted by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    /// Field name; dots address nested objects (`author.id`)
    pub name: String,

    /// Value type
    #[serde(default)]
    pub kind: FieldKind,

    /// Whether null values are allowed (they sort first)
    #[serde(default)]
    pub nullable: bool,

    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortField {
    /// Create a non-null ascending sort field
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            direction: SortDirection::Ascending,
        }
    }

    /// Allow null values
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Sort descending
    #[must_use]
    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Descending;
        self
    }

    /// Check if a bookmark component is valid for this field
    pub fn accepts(&self, bookmark: &Bookmark) -> bool {
        if bookmark.is_null() {
            self.nullable
        } else {
            self.kind.accepts(bookmark)
        }
    }

    /// Read this field's bookmark component from a JSON record
    pub fn bookmark_for(&self, record: &JsonValue) -> Result<Bookmark> {
        match extract_field(record, &self.name) {
            Some(value) => {
                let bookmark = json_to_bookmark(value, self.kind)
                    .map_err(|message| Error::invalid_value(&self.name, message))?;
                if bookmark.is_null() && !self.nullable {
                    return Err(Error::invalid_value(&self.name, "null in non-nullable field"));
                }
                Ok(bookmark)
            }
            None if self.nullable => Ok(Bookmark::Null),
            None => Err(Error::missing_field(&self.name)),
        }
    }
}

/// Extract a field from a JSON record by dotted path
pub fn extract_field<'a>(record: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = record;
    for part in path.split('.') {
        match current {
            JsonValue::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

/// Convert a JSON scalar into a bookmark of the given kind
///
/// Errors carry a human-readable reason; JSON null always maps to `Null`.
pub fn json_to_bookmark(value: &JsonValue, kind: FieldKind) -> std::result::Result<Bookmark, String> {
    if value.is_null() {
        return Ok(Bookmark::Null);
    }

    match kind {
        FieldKind::Integer => value
            .as_i64()
            .map(Bookmark::Int)
            .ok_or_else(|| format!("expected integer, got {value}")),
        FieldKind::Text => value
            .as_str()
            .map(Bookmark::from)
            .ok_or_else(|| format!("expected string, got {value}")),
        FieldKind::Boolean => value
            .as_bool()
            .map(Bookmark::Bool)
            .ok_or_else(|| format!("expected boolean, got {value}")),
        FieldKind::Timestamp => parse_timestamp(value)
            .map(Bookmark::Time)
            .ok_or_else(|| format!("expected timestamp, got {value}")),
        FieldKind::Any => match value {
            JsonValue::Bool(b) => Ok(Bookmark::Bool(*b)),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Bookmark::Int)
                .ok_or_else(|| format!("unsupported number {n}")),
            JsonValue::String(s) => Ok(Bookmark::Text(s.clone())),
            _ => Err(format!("unsupported sort value {value}")),
        },
    }
}

/// RFC 3339, SQL-style `YYYY-MM-DD HH:MM:SS[.f][+zz]` (naive = UTC), or epoch seconds
fn parse_timestamp(value: &JsonValue) -> Option<DateTime<Utc>> {
    match value {
        JsonValue::String(s) => DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%#z"))
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        JsonValue::Number(n) => n.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0)),
        _ => None,
    }
}
