//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bookmark pagination CLI
#[derive(Parser, Debug)]
#[command(name = "bookmarked")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Collection definition file (YAML)
    #[arg(short, long, global = true)]
    pub definition: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a page of the collection
    Page {
        /// Items per page
        #[arg(long)]
        per_page: usize,

        /// Page token from a previous page
        #[arg(long)]
        page: Option<String>,

        /// Follow next-page tokens until the collection is exhausted
        #[arg(long)]
        all: bool,

        /// Stop after this many pages (with --all)
        #[arg(long)]
        max_pages: Option<usize>,
    },

    /// Decode a page token into its bookmark
    Decode {
        /// Page token
        token: String,
    },

    /// Encode a bookmark (tagged JSON) into a page token
    Encode {
        /// Bookmark JSON, e.g. '{"type":"int","value":42}'
        bookmark: String,
    },

    /// Validate the collection definition
    Validate,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
