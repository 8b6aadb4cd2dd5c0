//! End-to-end tests for the tableprof binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;

fn snapshot_json() -> serde_json::Value {
    json!({
        "table_name": "customers",
        "columns": [
            {"name": "id", "declared_type": "INTEGER", "is_primary_key": true},
            {"name": "email", "declared_type": "TEXT"},
            {"name": "age", "declared_type": "INTEGER"}
        ],
        "rows": [
            {"id": 1, "email": "alice@example.com", "age": 34},
            {"id": 2, "email": "bob@example.com", "age": 29},
            {"id": 3, "email": null, "age": 151}
        ]
    })
}

#[test]
fn profile_single_snapshot_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("snapshot.json");
    fs::write(&input, snapshot_json().to_string()).unwrap();

    let output = Command::cargo_bin("tableprof")
        .unwrap()
        .args(["--quiet", "profile", "--input"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());

    let profile: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(profile["table_name"], "customers");
    assert_eq!(
        profile["column_profiles"]["email"]["semantic_type"],
        "PII_EMAIL"
    );
    // The 151 value trips the age rule
    assert_eq!(
        profile["column_profiles"]["age"]["anomalies"][0]["type"],
        "business_rule_violation"
    );
}

#[test]
fn profile_array_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("snapshots.json");
    let output_path = dir.path().join("profiles.json");
    fs::write(&input, json!([snapshot_json()]).to_string()).unwrap();

    Command::cargo_bin("tableprof")
        .unwrap()
        .args(["--quiet", "profile", "--pretty", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output_path)
        .assert()
        .success();

    let rendered = fs::read_to_string(&output_path).unwrap();
    let profiles: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert!(profiles.is_array());
    assert_eq!(profiles[0]["table_name"], "customers");
}

#[test]
fn invalid_snapshot_degrades_to_error_object() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("snapshots.json");
    fs::write(
        &input,
        json!([snapshot_json(), {"table_name": "broken"}]).to_string(),
    )
    .unwrap();

    let output = Command::cargo_bin("tableprof")
        .unwrap()
        .args(["--quiet", "profile", "--input"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());

    let profiles: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // Good table profiled, bad table reported in position
    assert_eq!(profiles[0]["table_name"], "customers");
    assert_eq!(profiles[1]["table"], "broken");
    assert!(profiles[1]["error"].is_string());
}

#[test]
fn resolve_schema_map() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("schemas.json");
    fs::write(
        &input,
        json!({
            "shop.customers": {
                "columns": [{"name": "id", "type": "INTEGER", "primary_key": true}]
            },
            "shop.orders": {
                "columns": [
                    {"name": "id", "type": "INTEGER", "primary_key": true},
                    {"name": "customer_id", "type": "INTEGER"}
                ]
            }
        })
        .to_string(),
    )
    .unwrap();

    let output = Command::cargo_bin("tableprof")
        .unwrap()
        .args(["--quiet", "resolve", "--input"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());

    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let fks = &resolved["schema"]["shop.orders"]["foreign_keys"];
    assert_eq!(fks[0]["to_table"], "customers");

    let edges = resolved["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0]["source"], "shop.orders");
    assert_eq!(edges[0]["target"], "shop.customers");
}

#[test]
fn missing_input_file_fails() {
    Command::cargo_bin("tableprof")
        .unwrap()
        .args(["--quiet", "profile", "--input", "/nonexistent/snapshot.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}
