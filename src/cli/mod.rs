//! CLI module
//!
//! Command-line interface for paging through collection definitions.
//!
//! # Commands
//!
//! - `page` - Fetch one page, or every page with `--all`
//! - `decode` - Show the bookmark inside a page token
//! - `encode` - Turn a bookmark into a page token
//! - `validate` - Check a collection definition

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
