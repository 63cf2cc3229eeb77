//! Bookmark value types
//!
//! The derived ordering ranks variants first (in declaration order) and then
//! compares values, so `Null` sorts before every other bookmark.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered cursor value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Bookmark {
    /// Missing value of a nullable sort key
    Null,

    /// Boolean sort key
    Bool(bool),

    /// Integer sort key (typically a unique identifier)
    Int(i64),

    /// Text sort key
    Text(String),

    /// Timestamp sort key
    Time(DateTime<Utc>),

    /// Composite sort key, one entry per sort field
    Tuple(Vec<Bookmark>),

    /// Cursor into a concatenation of collections
    Concat {
        /// Label of the active sub-collection
        source: String,
        /// Native bookmark inside that sub-collection (`None` = its start)
        position: Option<Box<Bookmark>>,
    },

    /// Cursor into a merge of collections, one position per sub-collection
    Merge(Vec<MergePosition>),
}

/// Position of one sub-collection inside a merged bookmark
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MergePosition {
    /// Sub-collection label
    pub source: String,
    /// Bookmark of the last item consumed from it (`None` = nothing consumed)
    #[serde(default)]
    pub position: Option<Bookmark>,
}

impl MergePosition {
    /// Create a merge position
    pub fn new(source: impl Into<String>, position: Option<Bookmark>) -> Self {
        Self {
            source: source.into(),
            position,
        }
    }
}

impl Bookmark {
    /// Create a concat cursor
    pub fn concat(source: impl Into<String>, position: Option<Bookmark>) -> Self {
        Self::Concat {
            source: source.into(),
            position: position.map(Box::new),
        }
    }

    /// Check if this is the null bookmark
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the integer value, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the text value, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the composite parts, if any
    pub fn as_tuple(&self) -> Option<&[Bookmark]> {
        match self {
            Self::Tuple(parts) => Some(parts),
            _ => None,
        }
    }

    /// Short name of the bookmark shape
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Time(_) => "time",
            Self::Tuple(_) => "tuple",
            Self::Concat { .. } => "concat",
            Self::Merge(_) => "merge",
        }
    }

    /// Check if this is a single scalar value
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool(_) | Self::Int(_) | Self::Text(_) | Self::Time(_)
        )
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Time(t) => write!(f, "{}", t.to_rfc3339()),
            Self::Tuple(parts) => {
                write!(f, "(")?;
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{part}")?;
                }
                write!(f, ")")
            }
            Self::Concat { source, position } => match position {
                Some(position) => write!(f, "{source}@{position}"),
                None => write!(f, "{source}@start"),
            },
            Self::Merge(positions) => {
                write!(f, "{{")?;
                for (i, pos) in positions.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &pos.position {
                        Some(position) => write!(f, "{}: {position}", pos.source)?,
                        None => write!(f, "{}: start", pos.source)?,
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<i64> for Bookmark {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Bookmark {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for Bookmark {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Bookmark {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Bookmark {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<DateTime<Utc>> for Bookmark {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl From<Vec<Bookmark>> for Bookmark {
    fn from(parts: Vec<Bookmark>) -> Self {
        Self::Tuple(parts)
    }
}

impl<T: Into<Bookmark>> From<Option<T>> for Bookmark {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
