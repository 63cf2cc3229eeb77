//! Definition types
//!
//! Declarative collection definitions for YAML parsing.

use crate::bookmarker::SortField;
use crate::collection::{FilterMode, FilterOptions, DEFAULT_MAX_FETCH, DEFAULT_MAX_ROUNDS};
use crate::types::JsonValue;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Environment variable overriding `filter_max_rounds`
pub const MAX_ROUNDS_ENV: &str = "BOOKMARKED_FILTER_MAX_ROUNDS";

// ============================================================================
// Collection Definition
// ============================================================================

/// Top-level collection definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CollectionDefinition {
    /// Collection name
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: Option<String>,
    /// Where items come from
    pub source: SourceDefinition,
    /// Sort fields, most significant first
    pub sort: Vec<SortField>,
    /// Optional filter
    #[serde(default)]
    pub filter: Option<FilterDefinition>,
    /// Fields to keep in every item (dotted paths allowed)
    #[serde(default)]
    pub select: Option<Vec<String>>,
    /// Pagination tuning
    #[serde(default)]
    pub settings: PaginationSettings,
}

// ============================================================================
// Source Definition
// ============================================================================

/// Ordered source of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SourceDefinition {
    /// JSON file holding an array of objects
    Json {
        /// File path, relative to the definition file when loaded from disk
        path: PathBuf,
    },
    /// Items listed in the definition itself
    Inline {
        /// The items
        items: Vec<JsonValue>,
    },
    /// DuckDB table or query
    Duckdb {
        /// Database file, or `:memory:`
        #[serde(default = "default_database")]
        database: String,
        /// Table name
        #[serde(default)]
        table: Option<String>,
        /// SELECT statement
        #[serde(default)]
        query: Option<String>,
        /// Statements run once when the collection is built
        #[serde(default)]
        setup: Option<String>,
    },
}

fn default_database() -> String {
    ":memory:".to_string()
}

impl SourceDefinition {
    /// Source kind name for messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Json { .. } => "json",
            Self::Inline { .. } => "inline",
            Self::Duckdb { .. } => "duckdb",
        }
    }
}

// ============================================================================
// Filter Definition
// ============================================================================

/// Field comparison filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterDefinition {
    /// Field to compare (dotted paths allowed)
    pub field: String,
    /// Keep items whose field equals this value
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub equals: Option<JsonValue>,
    /// Keep items whose field differs from this value
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub not_equals: Option<JsonValue>,
    /// One inner page per outer page instead of filling pages
    #[serde(default)]
    pub sync: bool,
}

/// A key that is present is `Some`, even when its value is `null`
fn present_value<'de, D>(deserializer: D) -> Result<Option<JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    JsonValue::deserialize(deserializer).map(Some)
}

// ============================================================================
// Pagination Settings
// ============================================================================

/// Pagination tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginationSettings {
    /// Maximum inner fetches per filtered page
    #[serde(default = "default_max_rounds")]
    pub filter_max_rounds: usize,
    /// Largest inner page size a filter grows to
    #[serde(default = "default_max_fetch")]
    pub filter_max_fetch: usize,
}

fn default_max_rounds() -> usize {
    DEFAULT_MAX_ROUNDS
}

fn default_max_fetch() -> usize {
    DEFAULT_MAX_FETCH
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            filter_max_rounds: DEFAULT_MAX_ROUNDS,
            filter_max_fetch: DEFAULT_MAX_FETCH,
        }
    }
}

impl PaginationSettings {
    /// Apply `BOOKMARKED_FILTER_MAX_ROUNDS` if set
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_max_rounds_override(std::env::var(MAX_ROUNDS_ENV).ok().as_deref())
    }

    /// Apply a raw `filter_max_rounds` override; unparsable values are ignored
    #[must_use]
    pub fn with_max_rounds_override(mut self, raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return self;
        };
        match raw.trim().parse::<usize>() {
            Ok(rounds) if rounds > 0 => self.filter_max_rounds = rounds,
            _ => tracing::warn!(
                variable = MAX_ROUNDS_ENV,
                value = raw,
                "Ignoring invalid filter round override"
            ),
        }
        self
    }

    /// Filter options for the given mode
    pub fn filter_options(&self, sync: bool) -> FilterOptions {
        FilterOptions {
            mode: if sync { FilterMode::Sync } else { FilterMode::Async },
            max_rounds: self.filter_max_rounds,
            max_fetch: self.filter_max_fetch,
        }
    }
}
