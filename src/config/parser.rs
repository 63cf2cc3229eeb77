//! YAML parser for collection definitions
//!
//! Parses and validates collection definition files.

use super::types::{CollectionDefinition, FilterDefinition, SourceDefinition};
use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a collection definition from a file
///
/// A relative `json` source path is resolved against the definition's
/// directory.
pub fn load_definition(path: impl AsRef<Path>) -> Result<CollectionDefinition> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read definition file '{}': {e}",
            path.display()
        ))
    })?;
    let mut def = load_definition_from_str(&content)?;

    if let SourceDefinition::Json { path: data } = &mut def.source {
        if data.is_relative() {
            if let Some(dir) = path.parent() {
                *data = dir.join(&*data);
            }
        }
    }

    tracing::debug!(name = %def.name, path = %path.display(), "Loaded collection definition");
    Ok(def)
}

/// Load a collection definition from a YAML string
pub fn load_definition_from_str(yaml: &str) -> Result<CollectionDefinition> {
    let def: CollectionDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse definition YAML: {e}")))?;

    validate_definition(&def)?;
    Ok(def)
}

/// Validate a collection definition
pub fn validate_definition(def: &CollectionDefinition) -> Result<()> {
    if def.name.trim().is_empty() {
        return Err(Error::config("Collection name cannot be empty"));
    }

    if def.sort.is_empty() {
        return Err(Error::config(format!(
            "Collection '{}' must have at least one sort field",
            def.name
        )));
    }

    let mut seen = HashSet::new();
    for field in &def.sort {
        if field.name.is_empty() {
            return Err(Error::config(format!(
                "Collection '{}' has a sort field without a name",
                def.name
            )));
        }
        if !seen.insert(field.name.as_str()) {
            return Err(Error::config(format!(
                "Collection '{}' sorts by '{}' more than once",
                def.name, field.name
            )));
        }
    }

    validate_source(def)?;

    if let Some(filter) = &def.filter {
        validate_filter(&def.name, filter)?;
    }

    if let Some(select) = &def.select {
        if select.is_empty() || select.iter().any(String::is_empty) {
            return Err(Error::config(format!(
                "Collection '{}' select list must name at least one field",
                def.name
            )));
        }
    }

    if def.settings.filter_max_rounds == 0 || def.settings.filter_max_fetch == 0 {
        return Err(Error::config(format!(
            "Collection '{}' filter limits must be positive",
            def.name
        )));
    }

    Ok(())
}

fn validate_source(def: &CollectionDefinition) -> Result<()> {
    match &def.source {
        SourceDefinition::Json { path } if path.as_os_str().is_empty() => Err(Error::config(
            format!("Collection '{}' json source needs a path", def.name),
        )),
        SourceDefinition::Duckdb { table, query, .. } => {
            match (table.as_deref(), query.as_deref()) {
                (Some(t), None) if !t.trim().is_empty() => {}
                (None, Some(q)) if !q.trim().is_empty() => {}
                _ => {
                    return Err(Error::config(format!(
                        "Collection '{}' duckdb source needs exactly one of table or query",
                        def.name
                    )))
                }
            }
            if let Some(field) = def.sort.iter().find(|f| f.name.contains('.')) {
                return Err(Error::config(format!(
                    "Collection '{}' duckdb sort field '{}' must be a column name",
                    def.name, field.name
                )));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

fn validate_filter(name: &str, filter: &FilterDefinition) -> Result<()> {
    if filter.field.is_empty() {
        return Err(Error::config(format!(
            "Collection '{name}' filter needs a field"
        )));
    }
    if filter.equals.is_some() == filter.not_equals.is_some() {
        return Err(Error::config(format!(
            "Collection '{name}' filter needs exactly one of equals or not_equals"
        )));
    }
    Ok(())
}
