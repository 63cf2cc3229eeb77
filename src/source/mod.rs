//! Ordered source module
//!
//! Fetch callbacks over concrete data: an in-memory list and a DuckDB-backed
//! keyset query. Any other sorted query executor plugs in through the
//! `Fetch` trait or a closure.

mod memory;
mod sql;

pub use memory::VecSource;
pub use sql::{SqlBase, SqlSource};

#[cfg(test)]
mod tests;
