//! Common types used throughout the crate
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Ordering Types
// ============================================================================

/// Direction in which an ordered source is traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest key first
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    /// Largest key first
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Turn a natural ordering into source order
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }

    /// Check if this is a descending direction
    pub fn is_descending(self) -> bool {
        matches!(self, Self::Descending)
    }

    /// SQL keyword for ORDER BY clauses
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}
