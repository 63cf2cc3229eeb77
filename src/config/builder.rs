//! Collection assembly from definitions

use super::types::{CollectionDefinition, FilterDefinition, SourceDefinition};
use crate::bookmarker::{extract_field, Bookmarker, CompositeBookmarker, SimpleBookmarker, SortField};
use crate::collection::{wrap_items, BoxedCollection, CollectionExt};
use crate::error::{Error, Result, ResultExt};
use crate::source::{SqlBase, SqlSource};
use crate::types::{JsonObject, JsonValue};
use std::fs;
use std::sync::Arc;

/// Build the collection a definition describes
///
/// ```text
/// source ─ [filter] ─ [select]
/// ```
pub fn build_collection(def: &CollectionDefinition) -> Result<BoxedCollection<JsonValue>> {
    let settings = def.settings.with_env_overrides();

    let mut collection = build_source(def)?;

    if let Some(filter) = &def.filter {
        let options = settings.filter_options(filter.sync);
        let predicate = predicate_for(filter);
        collection = collection.filter_items_with(predicate, options).boxed();
    }

    if let Some(fields) = &def.select {
        let fields = fields.clone();
        collection = collection
            .transform(move |item| project(&item, &fields))
            .boxed();
    }

    tracing::debug!(
        name = %def.name,
        source = def.source.kind(),
        sort_fields = def.sort.len(),
        filtered = def.filter.is_some(),
        "Built collection"
    );
    Ok(collection)
}

fn build_source(def: &CollectionDefinition) -> Result<BoxedCollection<JsonValue>> {
    match &def.source {
        SourceDefinition::Json { path } => {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::config(format!("Failed to read items file '{}': {e}", path.display()))
            })?;
            let items: Vec<JsonValue> = serde_json::from_str(&content)
                .with_context(|| format!("Invalid items file '{}'", path.display()))?;
            Ok(wrap_items(bookmarker_for(&def.sort), items)?.boxed())
        }
        SourceDefinition::Inline { items } => {
            Ok(wrap_items(bookmarker_for(&def.sort), items.clone())?.boxed())
        }
        SourceDefinition::Duckdb {
            database,
            table,
            query,
            setup,
        } => {
            let base = match (table, query) {
                (Some(table), None) => SqlBase::Table(table.clone()),
                (None, Some(query)) => SqlBase::Query(query.clone()),
                _ => {
                    return Err(Error::config(
                        "duckdb source needs exactly one of table or query",
                    ))
                }
            };
            let source = SqlSource::open(database, base, def.sort.clone())?;
            if let Some(setup) = setup {
                source.execute_batch(setup)?;
            }
            Ok(source.into_collection().boxed())
        }
    }
}

fn bookmarker_for(sort: &[SortField]) -> Arc<dyn Bookmarker<JsonValue>> {
    match sort {
        [field] => Arc::new(SimpleBookmarker::with_field(field.clone())),
        fields => Arc::new(CompositeBookmarker::new(fields.to_vec())),
    }
}

/// Missing fields compare as null
fn predicate_for(filter: &FilterDefinition) -> impl Fn(&JsonValue) -> bool + Send + Sync + 'static {
    let field = filter.field.clone();
    let (expected, keep_equal) = match (&filter.equals, &filter.not_equals) {
        (Some(value), _) => (value.clone(), true),
        (None, Some(value)) => (value.clone(), false),
        (None, None) => (JsonValue::Null, true),
    };

    move |item| {
        let actual = extract_field(item, &field).unwrap_or(&JsonValue::Null);
        (*actual == expected) == keep_equal
    }
}

/// Keep only the selected fields, keyed by their path
fn project(item: &JsonValue, fields: &[String]) -> JsonValue {
    let object: JsonObject = fields
        .iter()
        .filter_map(|field| {
            extract_field(item, field).map(|value| (field.clone(), value.clone()))
        })
        .collect();
    JsonValue::Object(object)
}
