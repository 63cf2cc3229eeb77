//! Collection definitions
//!
//! Describe a collection in YAML and build it at runtime.
//!
//! # Overview
//!
//! The config module provides:
//! - `CollectionDefinition` - source, sort fields, filter and projection
//! - `PaginationSettings` - filter limits, with an environment override
//! - YAML parsing with validation
//!
//! ```yaml
//! name: open_tickets
//! source:
//!   type: json
//!   path: tickets.json
//! sort:
//!   - name: priority
//!     kind: integer
//!     direction: desc
//!   - name: id
//!     kind: integer
//! filter:
//!   field: status
//!   equals: open
//! select: [id, title, priority]
//! ```

mod builder;
mod parser;
mod types;

pub use builder::build_collection;
pub use parser::{load_definition, load_definition_from_str, validate_definition};
pub use types::{
    CollectionDefinition, FilterDefinition, PaginationSettings, SourceDefinition, MAX_ROUNDS_ENV,
};
