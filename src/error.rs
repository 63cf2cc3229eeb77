//! Error types for bookmarked collections
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Malformed page tokens are deliberately absent: a token that cannot be
//! decoded restarts pagination instead of failing.

use thiserror::Error;

/// The main error type for bookmarked collections
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller Contract Errors
    // ============================================================================
    #[error("per_page must be a positive integer")]
    InvalidPerPage,

    // ============================================================================
    // Bookmark Errors
    // ============================================================================
    #[error("Item is missing sort field '{field}'")]
    MissingSortField { field: String },

    #[error("Invalid value for sort field '{field}': {message}")]
    InvalidSortValue { field: String, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("Ordered source failed: {0}")]
    Source(#[from] anyhow::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing sort field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingSortField {
            field: field.into(),
        }
    }

    /// Create an invalid sort value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSortValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a source error from any message
    pub fn source_failed(message: impl Into<String>) -> Self {
        Self::Source(anyhow::anyhow!(message.into()))
    }

    /// Check if this error is a caller contract violation rather than a data error
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::InvalidPerPage)
    }
}

/// Result type alias for bookmarked collections
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
