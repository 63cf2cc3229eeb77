//! CLI integration tests
//!
//! Runs commands against definition files written to a temp directory and
//! checks the emitted JSON messages.

use bookmarked_collection::bookmark::encode;
use bookmarked_collection::cli::{Cli, Runner};
use bookmarked_collection::Bookmark;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DEFINITION: &str = r#"
name: fruits
source:
  type: inline
  items:
    - {id: 3, name: cherry, ripe: true}
    - {id: 1, name: apple, ripe: true}
    - {id: 2, name: banana, ripe: false}
    - {id: 4, name: date, ripe: true}
sort:
  - name: id
    kind: integer
filter:
  field: ripe
  equals: true
select: [id, name]
"#;

fn write_definition(dir: &TempDir, yaml: &str) -> PathBuf {
    let path = dir.path().join("fruits.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

fn run(args: &[&str]) -> Result<Vec<Value>, bookmarked_collection::Error> {
    let cli = Cli::parse_from(std::iter::once("bookmarked").chain(args.iter().copied()));
    let mut out = Vec::new();
    Runner::new(cli).run_with(&mut out)?;

    let text = String::from_utf8(out).unwrap();
    Ok(text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect())
}

// ============================================================================
// Page Command Tests
// ============================================================================

#[test]
fn test_page_command_first_page() {
    let dir = TempDir::new().unwrap();
    let path = write_definition(&dir, DEFINITION);
    let path = path.to_str().unwrap();

    let messages = run(&["-d", path, "page", "--per-page", "2"]).unwrap();
    assert_eq!(messages.len(), 1);

    let message = &messages[0];
    assert_eq!(message["type"], "PAGE");
    assert_eq!(message["collection"], "fruits");
    assert_eq!(
        message["page"]["items"],
        json!([{"id": 1, "name": "apple"}, {"id": 3, "name": "cherry"}])
    );
    assert_eq!(message["page"]["next_bookmark"], json!({"type": "int", "value": 3}));
    assert_eq!(message["page"]["next_page"], json!(encode(&Bookmark::Int(3))));
}

#[test]
fn test_page_command_resumes_from_token() {
    let dir = TempDir::new().unwrap();
    let path = write_definition(&dir, DEFINITION);
    let token = encode(&Bookmark::Int(3));

    let messages = run(&[
        "-d",
        path.to_str().unwrap(),
        "page",
        "--per-page",
        "2",
        "--page",
        &token,
    ])
    .unwrap();

    assert_eq!(messages[0]["page"]["items"], json!([{"id": 4, "name": "date"}]));
    assert_eq!(messages[0]["page"]["next_page"], Value::Null);
}

#[test]
fn test_page_command_all_pages() {
    let dir = TempDir::new().unwrap();
    let path = write_definition(&dir, DEFINITION);
    let path = path.to_str().unwrap();

    let messages = run(&["-d", path, "page", "--per-page", "1", "--all"]).unwrap();
    let names: Vec<Value> = messages
        .iter()
        .flat_map(|message| message["page"]["items"].as_array().unwrap().clone())
        .map(|item| item["name"].clone())
        .collect();

    assert_eq!(names, vec![json!("apple"), json!("cherry"), json!("date")]);
    assert_eq!(messages.last().unwrap()["number"], 3);
}

#[test]
fn test_page_command_max_pages() {
    let dir = TempDir::new().unwrap();
    let path = write_definition(&dir, DEFINITION);

    let messages = run(&[
        "-d",
        path.to_str().unwrap(),
        "page",
        "--per-page",
        "1",
        "--all",
        "--max-pages",
        "2",
    ])
    .unwrap();
    assert_eq!(messages.len(), 2);
}

#[test]
fn test_page_command_needs_definition() {
    let err = run(&["page", "--per-page", "1"]).unwrap_err();
    assert!(err.to_string().contains("use -d flag"));
}

#[test]
fn test_page_command_rejects_zero_per_page() {
    let dir = TempDir::new().unwrap();
    let path = write_definition(&dir, DEFINITION);

    let err = run(&["-d", path.to_str().unwrap(), "page", "--per-page", "0"]).unwrap_err();
    assert!(err.is_contract_violation());
}

// ============================================================================
// Token Command Tests
// ============================================================================

#[test]
fn test_encode_then_decode() {
    let messages = run(&["encode", r#"{"type":"text","value":"b/c"}"#]).unwrap();
    let token = messages[0]["token"].as_str().unwrap().to_string();
    assert!(token.starts_with("bookmark:"));

    let messages = run(&["decode", &token]).unwrap();
    assert_eq!(messages[0]["type"], "BOOKMARK");
    assert_eq!(messages[0]["bookmark"], json!({"type": "text", "value": "b/c"}));
}

#[test]
fn test_decode_garbage_is_null() {
    let messages = run(&["decode", "bookmark:W1td"]).unwrap();
    assert_eq!(messages[0]["bookmark"], Value::Null);

    let messages = run(&["decode", "7"]).unwrap();
    assert_eq!(messages[0]["bookmark"], Value::Null);
}

#[test]
fn test_encode_rejects_invalid_bookmark() {
    assert!(run(&["encode", r#"{"type":"nope"}"#]).is_err());
}

// ============================================================================
// Validate Command Tests
// ============================================================================

#[test]
fn test_validate_command() {
    let dir = TempDir::new().unwrap();
    let path = write_definition(&dir, DEFINITION);

    let messages = run(&["-d", path.to_str().unwrap(), "validate"]).unwrap();
    assert_eq!(messages[0]["type"], "LOG");
    assert!(messages[0]["log"]["message"]
        .as_str()
        .unwrap()
        .contains("'fruits' is valid"));
}

#[test]
fn test_validate_command_reports_errors() {
    let dir = TempDir::new().unwrap();
    let yaml = "name: fruits\nsource: {type: inline, items: []}\nsort: []\n";
    let path = write_definition(&dir, yaml);

    let err = run(&["-d", path.to_str().unwrap(), "validate"]).unwrap_err();
    assert!(err.to_string().contains("at least one sort field"));
}

#[test]
fn test_pretty_format() {
    let cli = Cli::parse_from(["bookmarked", "--format", "pretty", "decode", "1"]);
    let mut out = Vec::new();
    Runner::new(cli).run_with(&mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\n  \"bookmark\": null"));
}
