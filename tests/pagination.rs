//! End-to-end pagination tests
//!
//! Tests the public API: tokens → paginate → next_page, over in-memory and
//! closure-backed sources.

use bookmarked_collection::bookmark::{decode, encode};
use bookmarked_collection::{
    filter, wrap, wrap_items, Bookmark, Collection, CollectionExt, Error, FieldKind, KeyBookmarker,
    MergePosition, PageRequest, Pager, Result, SimpleBookmarker, SortField,
};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, RwLock};
use test_case::test_case;

#[derive(Debug, Clone, PartialEq)]
struct Post {
    id: i64,
    published: bool,
}

fn posts(n: i64) -> Vec<Post> {
    (1..=n)
        .map(|id| Post {
            id,
            published: id % 3 != 0,
        })
        .collect()
}

fn post_ids<'a>(items: impl IntoIterator<Item = &'a Post>) -> Vec<i64> {
    items.into_iter().map(|post| post.id).collect()
}

fn by_id() -> KeyBookmarker<Post, impl Fn(&Post) -> Bookmark + Send + Sync> {
    KeyBookmarker::new(|post: &Post| Bookmark::Int(post.id))
        .with_validator(|bookmark| matches!(bookmark, Bookmark::Int(_)))
}

/// Follow next-page tokens to the end, returning every page
fn all_pages<C: Collection>(collection: &C, per_page: usize) -> Vec<Vec<C::Item>> {
    let mut pages = Vec::new();
    let mut request = PageRequest::per_page(per_page);
    loop {
        let page = collection.paginate(&request).unwrap();
        let next = page.next_page();
        pages.push(page.into_items());
        match next {
            Some(token) => request = PageRequest::per_page(per_page).with_page(token),
            None => return pages,
        }
        assert!(pages.len() < 10_000, "pagination did not terminate");
    }
}

// ============================================================================
// Token Round-Trip Tests
// ============================================================================

#[test]
fn test_round_trip_all_bookmark_shapes() {
    let bookmarks = vec![
        Bookmark::Null,
        Bookmark::Bool(false),
        Bookmark::Int(i64::MIN),
        Bookmark::Int(i64::MAX),
        Bookmark::Text(String::new()),
        Bookmark::Text("quote \" slash / plus + eq = ünïcødé 🙂".to_string()),
        Bookmark::Time(Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap()),
        Bookmark::Tuple(vec![Bookmark::Int(7), Bookmark::Null, Bookmark::from("x")]),
        Bookmark::concat("archived", Some(Bookmark::Int(12))),
        Bookmark::concat("live", None),
        Bookmark::Merge(vec![
            MergePosition::new("comments", Some(Bookmark::Int(4))),
            MergePosition::new("likes", None),
        ]),
    ];

    for bookmark in bookmarks {
        let token = encode(&bookmark);
        assert!(token.starts_with("bookmark:"));
        assert!(!token.contains(['+', '/', '=']), "token not url-safe: {token}");
        assert_eq!(decode(&token), Some(bookmark));
    }
}

// ============================================================================
// Malformed Token Tests
// ============================================================================

#[test_case("1" ; "legacy page number")]
#[test_case("42" ; "another page number")]
#[test_case("bookmark:W1td" ; "garbage payload")]
#[test_case("bookmark:" ; "empty payload")]
#[test_case("bookmark:eyJ0eXBlIjoiaW50IiwidmFsdWUiOiJ4In0" ; "wrong value type")]
#[test_case("bookmark:eyJ0eXBlIjoidGV4dCIsInZhbHVlIjoiMiJ9" ; "rejected by validator")]
#[test_case("BOOKMARK:eyJ0eXBlIjoiaW50IiwidmFsdWUiOjJ9" ; "wrong prefix case")]
#[test_case("bookmark:%%%" ; "not base64")]
fn test_malformed_token_matches_first_page(token: &str) {
    let collection = wrap_items(by_id(), posts(5)).unwrap();

    let first = collection.paginate(&PageRequest::per_page(2)).unwrap();
    let page = collection
        .paginate(&PageRequest::per_page(2).with_page(token))
        .unwrap();

    assert_eq!(page.items(), first.items());
    assert_eq!(page.next_bookmark(), first.next_bookmark());
    assert!(page.current_bookmark().is_none());
}

#[test]
fn test_garbage_token_has_no_current_bookmark() {
    assert!(decode("bookmark:W1td").is_none());

    let collection = wrap_items(by_id(), posts(3)).unwrap();
    let page = collection
        .paginate(&PageRequest::per_page(1).with_page("bookmark:W1td"))
        .unwrap();
    assert!(page.current_bookmark().is_none());
    assert_eq!(post_ids(page.iter()), vec![1]);
}

// ============================================================================
// Exhaustiveness Tests
// ============================================================================

#[test]
fn test_three_items_one_per_page() {
    let collection = wrap_items(by_id(), posts(3)).unwrap();

    let page = collection.paginate(&PageRequest::per_page(1)).unwrap();
    assert_eq!(post_ids(page.iter()), vec![1]);
    assert!(page.next_bookmark().is_some());

    let page = collection
        .paginate(&PageRequest::per_page(1).with_page(page.next_page().unwrap()))
        .unwrap();
    assert_eq!(post_ids(page.iter()), vec![2]);

    let page = collection
        .paginate(&PageRequest::per_page(1).with_page(page.next_page().unwrap()))
        .unwrap();
    assert_eq!(post_ids(page.iter()), vec![3]);
    assert!(page.next_bookmark().is_none());
    assert!(page.next_page().is_none());
}

#[test]
fn test_every_item_once_in_source_order() {
    let mut shuffled = posts(37);
    shuffled.reverse();
    shuffled.swap(3, 20);
    let collection = wrap_items(by_id(), shuffled).unwrap();

    for per_page in [1, 2, 3, 10, 36, 37, 38, 100] {
        let pages = all_pages(&collection, per_page);
        let ids: Vec<i64> = pages.iter().flat_map(|page| post_ids(page)).collect();
        assert_eq!(ids, (1..=37).collect::<Vec<_>>(), "per_page = {per_page}");
    }
}

#[test]
fn test_json_records_with_simple_bookmarker() {
    let records: Vec<Value> = ["carol", "alice", "bob"]
        .iter()
        .map(|name| json!({"name": name}))
        .collect();
    let collection = wrap_items(
        SimpleBookmarker::with_field(SortField::new("name", FieldKind::Text)),
        records,
    )
    .unwrap();

    let names: Vec<Value> = all_pages(&collection, 2)
        .into_iter()
        .flatten()
        .map(|record| record["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("alice"), json!("bob"), json!("carol")]);
}

// ============================================================================
// Filter Tests
// ============================================================================

#[test]
fn test_filter_excluding_middle_item() {
    let collection = filter(wrap_items(by_id(), posts(3)).unwrap(), |post| post.id != 2);
    let page = collection.paginate(&PageRequest::per_page(6)).unwrap();

    assert_eq!(post_ids(page.iter()), vec![1, 3]);
    assert!(page.next_bookmark().is_none());
}

#[test]
fn test_filter_excluding_everything() {
    let collection = filter(wrap_items(by_id(), posts(3)).unwrap(), |_| false);
    let page = collection.paginate(&PageRequest::per_page(1)).unwrap();

    assert!(page.is_empty());
    assert!(page.next_bookmark().is_none());
}

#[test]
fn test_filtered_pages_are_full_until_the_last() {
    let source = posts(100);
    let matching: Vec<i64> = source
        .iter()
        .filter(|post| post.published)
        .map(|post| post.id)
        .collect();
    let collection = wrap_items(by_id(), source)
        .unwrap()
        .filter_items(|post| post.published);

    for per_page in [1, 3, 7, 20, 200] {
        let pages = all_pages(&collection, per_page);
        let (last, full) = pages.split_last().unwrap();
        assert!(full.iter().all(|page| page.len() == per_page));
        assert!(last.len() <= per_page);

        let ids: Vec<i64> = pages.iter().flat_map(|page| post_ids(page)).collect();
        assert_eq!(ids, matching, "per_page = {per_page}");
    }
}

// ============================================================================
// Contract Tests
// ============================================================================

#[test]
fn test_missing_per_page_is_contract_violation() {
    let collection = wrap_items(by_id(), posts(3)).unwrap();
    let err = collection.paginate(&PageRequest::new()).unwrap_err();

    assert!(matches!(err, Error::InvalidPerPage));
    assert!(err.is_contract_violation());
}

#[test]
fn test_total_entries_is_silently_ignored() {
    let collection = wrap_items(by_id(), posts(3)).unwrap();
    let request: PageRequest =
        serde_json::from_value(json!({"per_page": 2, "total_entries": 9000})).unwrap();
    let page = collection.paginate(&request).unwrap();

    assert_eq!(post_ids(page.iter()), vec![1, 2]);
    assert_eq!(page.total_entries(), None);
}

#[test]
fn test_page_summary_serializes() {
    let collection = wrap_items(by_id(), posts(3)).unwrap().transform(|post| post.id);
    let page = collection.paginate(&PageRequest::per_page(2)).unwrap();
    let summary = serde_json::to_value(page.summary()).unwrap();

    assert_eq!(summary["items"], json!([1, 2]));
    assert_eq!(summary["current_bookmark"], Value::Null);
    assert_eq!(summary["next_bookmark"], json!({"type": "int", "value": 2}));
    assert_eq!(summary["next_page"], json!(encode(&Bookmark::Int(2))));
}

// ============================================================================
// Concurrent Modification Tests
// ============================================================================

/// Closure-backed source over a shared, unsorted table
fn live_table(table: Arc<RwLock<Vec<Post>>>) -> impl Collection<Item = Post> {
    wrap(by_id(), move |pager: &mut Pager<Post>| -> Result<()> {
        let rows = table.read().map_err(|_| Error::source_failed("table lock poisoned"))?;
        let after = pager.current_bookmark().and_then(Bookmark::as_int);
        let mut matching: Vec<Post> = rows
            .iter()
            .filter(|post| after.map_or(true, |after| post.id > after))
            .cloned()
            .collect();
        matching.sort_by_key(|post| post.id);
        // One extra row signals that more remain
        matching.truncate(pager.per_page() + 1);
        pager.extend(matching);
        Ok(())
    })
}

#[test]
fn test_inserts_and_deletes_between_pages() {
    let table = Arc::new(RwLock::new(
        [10, 20, 30, 40, 50]
            .into_iter()
            .map(|id| Post { id, published: true })
            .collect::<Vec<_>>(),
    ));
    let collection = live_table(Arc::clone(&table));

    let first = collection.paginate(&PageRequest::per_page(2)).unwrap();
    assert_eq!(post_ids(first.iter()), vec![10, 20]);

    {
        let mut rows = table.write().unwrap();
        // Sorts before the cursor: never seen by this walk
        rows.push(Post { id: 5, published: true });
        // Sorts after the cursor: seen
        rows.push(Post { id: 35, published: true });
        // Deleted before it was reached
        rows.retain(|post| post.id != 40);
    }

    let mut ids = post_ids(first.iter());
    let mut token = first.next_page();
    while let Some(next) = token {
        let page = collection
            .paginate(&PageRequest::per_page(2).with_page(next))
            .unwrap();
        ids.extend(post_ids(page.iter()));
        token = page.next_page();
    }

    assert_eq!(ids, vec![10, 20, 30, 35, 50]);
}

#[test]
fn test_concurrent_readers_share_a_collection() {
    let collection = Arc::new(wrap_items(by_id(), posts(50)).unwrap());

    let handles: Vec<_> = [1_usize, 4, 9]
        .into_iter()
        .map(|per_page| {
            let collection = Arc::clone(&collection);
            std::thread::spawn(move || {
                all_pages(&collection, per_page)
                    .into_iter()
                    .flatten()
                    .map(|post| post.id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (1..=50).collect::<Vec<_>>());
    }
}
