//! CLI runner - executes commands

use crate::bookmark::{decode, encode, Bookmark};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::collection::PageRequest;
use crate::config::{build_collection, load_definition, CollectionDefinition};
use crate::error::{Error, Result};
use serde_json::{json, Value};
use std::io::{self, Write};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing messages to stdout
    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with(&mut out)
    }

    /// Run the CLI command, writing messages to `out`
    pub fn run_with(&self, out: &mut impl Write) -> Result<()> {
        match &self.cli.command {
            Commands::Page {
                per_page,
                page,
                all,
                max_pages,
            } => self.page(out, *per_page, page.clone(), *all, *max_pages),
            Commands::Decode { token } => self.decode(out, token),
            Commands::Encode { bookmark } => self.encode(out, bookmark),
            Commands::Validate => self.validate(out),
        }
    }

    /// Load collection definition
    fn load_definition(&self) -> Result<CollectionDefinition> {
        let path = self
            .cli
            .definition
            .as_ref()
            .ok_or_else(|| Error::config("Definition file not specified (use -d flag)"))?;
        load_definition(path)
    }

    /// Fetch pages
    fn page(
        &self,
        out: &mut impl Write,
        per_page: usize,
        mut token: Option<String>,
        all: bool,
        max_pages: Option<usize>,
    ) -> Result<()> {
        let definition = self.load_definition()?;
        let collection = build_collection(&definition)?;

        let mut number = 0_usize;
        loop {
            let request = PageRequest::per_page(per_page).with_page_opt(token.take());
            let page = collection.paginate(&request)?;
            number += 1;

            let summary = serde_json::to_value(page.summary())?;
            self.output_message(
                out,
                &json!({
                    "type": "PAGE",
                    "collection": definition.name,
                    "number": number,
                    "page": summary,
                }),
            )?;

            token = page.next_page().map(String::from);
            let limit_reached = max_pages.is_some_and(|max| number >= max);
            if !all || token.is_none() || limit_reached {
                break;
            }
        }

        tracing::debug!(pages = number, "Finished paging");
        Ok(())
    }

    /// Decode a page token
    fn decode(&self, out: &mut impl Write, token: &str) -> Result<()> {
        let bookmark = serde_json::to_value(decode(token))?;
        self.output_message(
            out,
            &json!({
                "type": "BOOKMARK",
                "bookmark": bookmark,
            }),
        )
    }

    /// Encode a bookmark
    fn encode(&self, out: &mut impl Write, bookmark: &str) -> Result<()> {
        let bookmark: Bookmark = serde_json::from_str(bookmark)?;
        self.output_message(
            out,
            &json!({
                "type": "TOKEN",
                "token": encode(&bookmark),
            }),
        )
    }

    /// Validate collection definition
    fn validate(&self, out: &mut impl Write) -> Result<()> {
        let definition = self.load_definition()?;

        self.output_message(
            out,
            &json!({
                "type": "LOG",
                "log": {
                    "level": "INFO",
                    "message": format!(
                        "Collection '{}' is valid ({} source, {} sort fields)",
                        definition.name,
                        definition.source.kind(),
                        definition.sort.len()
                    )
                }
            }),
        )
    }

    /// Output a message
    fn output_message(&self, out: &mut impl Write, msg: &Value) -> Result<()> {
        let line = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(msg)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(msg)?,
        };
        writeln!(out, "{line}")?;
        Ok(())
    }
}
