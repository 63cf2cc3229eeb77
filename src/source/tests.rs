//! Tests for source module

use super::*;
use crate::bookmark::Bookmark;
use crate::bookmarker::{Bookmarker, FieldKind, SimpleBookmarker, SortField};
use crate::collection::{Collection, Fetch, PageRequest};
use crate::pager::Pager;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

// ============================================================================
// VecSource Tests
// ============================================================================

fn ids(pager: &Pager<Value>) -> Vec<i64> {
    pager.iter().map(|item| item["id"].as_i64().unwrap()).collect()
}

fn id_source(items: Vec<Value>) -> VecSource<Value> {
    let bookmarker: Arc<dyn Bookmarker<Value>> = Arc::new(SimpleBookmarker::new("id"));
    VecSource::new(items, bookmarker).unwrap()
}

#[test]
fn test_vec_source_sorts_items() {
    let source = id_source(vec![json!({"id": 3}), json!({"id": 1}), json!({"id": 2})]);
    assert_eq!(source.len(), 3);

    let mut pager = Pager::new(10).unwrap();
    source.fetch(&mut pager).unwrap();
    assert_eq!(ids(&pager), vec![1, 2, 3]);
    assert!(!pager.has_more());
}

#[test]
fn test_vec_source_resumes_strictly_after_bookmark() {
    let source = id_source((1..=5).map(|id| json!({"id": id})).collect());

    let mut pager = Pager::with_bookmark(2, Some(Bookmark::Int(2))).unwrap();
    source.fetch(&mut pager).unwrap();
    assert_eq!(ids(&pager), vec![3, 4]);
    assert!(pager.has_more());
}

#[test]
fn test_vec_source_bookmark_between_items() {
    let source = id_source(vec![json!({"id": 10}), json!({"id": 20})]);

    // Item 15 was deleted after the bookmark was issued
    let mut pager = Pager::with_bookmark(5, Some(Bookmark::Int(15))).unwrap();
    source.fetch(&mut pager).unwrap();
    assert_eq!(ids(&pager), vec![20]);
    assert!(!pager.has_more());
}

#[test]
fn test_vec_source_descending() {
    let bookmarker: Arc<dyn Bookmarker<Value>> = Arc::new(SimpleBookmarker::with_field(
        SortField::new("id", FieldKind::Integer).descending(),
    ));
    let source = VecSource::new(
        (1..=4).map(|id| json!({"id": id})).collect(),
        bookmarker,
    )
    .unwrap();

    let mut pager = Pager::with_bookmark(2, Some(Bookmark::Int(4))).unwrap();
    source.fetch(&mut pager).unwrap();
    assert_eq!(ids(&pager), vec![3, 2]);
    assert!(pager.has_more());
}

#[test]
fn test_vec_source_rejects_items_without_sort_field() {
    let bookmarker: Arc<dyn Bookmarker<Value>> = Arc::new(SimpleBookmarker::new("id"));
    let result = VecSource::new(vec![json!({"name": "no id"})], bookmarker);
    assert!(result.is_err());
}

// ============================================================================
// SqlSource Query Building Tests
// ============================================================================

fn sql_source(fields: Vec<SortField>) -> SqlSource {
    SqlSource::open(":memory:", SqlBase::Table("main.items".to_string()), fields).unwrap()
}

#[test]
fn test_build_query_first_page() {
    let source = sql_source(vec![SortField::new("id", FieldKind::Integer)]);
    let (query, params) = source.build_query(None, 3).unwrap();
    assert_eq!(
        query,
        "SELECT CAST(to_json(q) AS VARCHAR) FROM (SELECT * FROM \"main\".\"items\") AS q \
         ORDER BY q.\"id\" ASC NULLS FIRST LIMIT 3"
    );
    assert!(params.is_empty());
}

#[test]
fn test_build_query_composite_keyset() {
    let source = sql_source(vec![
        SortField::new("score", FieldKind::Integer).descending(),
        SortField::new("id", FieldKind::Integer),
    ]);
    let bookmark = Bookmark::Tuple(vec![Bookmark::Int(10), Bookmark::Int(4)]);
    let (query, params) = source.build_query(Some(&bookmark), 6).unwrap();

    assert!(query.contains(
        "WHERE (((q.\"score\" < ? OR q.\"score\" IS NULL)) OR \
         (q.\"score\" IS NOT DISTINCT FROM ? AND q.\"id\" > ?))"
    ));
    assert!(query.ends_with("ORDER BY q.\"score\" DESC NULLS LAST, q.\"id\" ASC NULLS FIRST LIMIT 6"));
    assert_eq!(params.len(), 3);
}

#[test]
fn test_build_query_null_component() {
    let source = sql_source(vec![
        SortField::new("due_at", FieldKind::Timestamp).nullable(),
        SortField::new("id", FieldKind::Integer),
    ]);
    let bookmark = Bookmark::Tuple(vec![Bookmark::Null, Bookmark::Int(4)]);
    let (query, params) = source.build_query(Some(&bookmark), 2).unwrap();

    assert!(query.contains("(q.\"due_at\" IS NOT NULL)"));
    assert!(query.contains("q.\"due_at\" IS NOT DISTINCT FROM ? AND q.\"id\" > ?"));
    assert_eq!(params.len(), 2);
}

#[test]
fn test_build_query_rejects_wrong_arity() {
    let source = sql_source(vec![
        SortField::new("a", FieldKind::Integer),
        SortField::new("b", FieldKind::Integer),
    ]);
    assert!(source.build_query(Some(&Bookmark::Int(1)), 2).is_err());
}

#[test]
fn test_sql_source_requires_plain_columns() {
    let result = SqlSource::open(
        ":memory:",
        SqlBase::Table("t".to_string()),
        vec![SortField::new("author.id", FieldKind::Integer)],
    );
    assert!(result.is_err());

    let result = SqlSource::open(":memory:", SqlBase::Table("t".to_string()), vec![]);
    assert!(result.is_err());
}

#[test]
fn test_query_base_strips_trailing_semicolon() {
    let source = SqlSource::open(
        ":memory:",
        SqlBase::Query("SELECT * FROM t WHERE x = 1;".to_string()),
        vec![SortField::new("id", FieldKind::Integer)],
    )
    .unwrap();
    let (query, _) = source.build_query(None, 1).unwrap();
    assert!(query.contains("FROM (SELECT * FROM t WHERE x = 1) AS q"));
}

// ============================================================================
// SqlSource Execution Tests
// ============================================================================

#[test]
fn test_sql_source_pages_through_table() {
    let source = SqlSource::open(
        ":memory:",
        SqlBase::Table("items".to_string()),
        vec![SortField::new("id", FieldKind::Integer)],
    )
    .unwrap();
    source
        .execute_batch(
            "CREATE TABLE items (id BIGINT, name VARCHAR);
             INSERT INTO items VALUES (3, 'c'), (1, 'a'), (2, 'b');",
        )
        .unwrap();
    let collection = source.into_collection();

    let page = collection.paginate(&PageRequest::per_page(2)).unwrap();
    assert_eq!(ids(&page), vec![1, 2]);
    assert_eq!(page.next_bookmark(), Some(&Bookmark::Int(2)));

    let next = page.next_page().unwrap();
    let page = collection
        .paginate(&PageRequest::per_page(2).with_page(next))
        .unwrap();
    assert_eq!(ids(&page), vec![3]);
    assert_eq!(page.items()[0]["name"], json!("c"));
    assert!(page.next_bookmark().is_none());
}

#[test]
fn test_build_query_clamps_limit() {
    let source = sql_source(vec![SortField::new("id", FieldKind::Integer)]);
    let (query, _) = source.build_query(None, usize::MAX).unwrap();
    assert!(query.ends_with(&format!("LIMIT {}", i64::MAX)));
}

#[test]
fn test_sql_source_huge_page_size() {
    let source = SqlSource::open(
        ":memory:",
        SqlBase::Table("items".to_string()),
        vec![SortField::new("id", FieldKind::Integer)],
    )
    .unwrap();
    source
        .execute_batch(
            "CREATE TABLE items (id BIGINT);
             INSERT INTO items VALUES (2), (3), (1);",
        )
        .unwrap();
    let collection = source.into_collection();

    let page = collection.paginate(&PageRequest::per_page(usize::MAX)).unwrap();
    assert_eq!(ids(&page), vec![1, 2, 3]);
    assert!(!page.has_more());
    assert!(page.next_page().is_none());
}
