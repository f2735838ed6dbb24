//! Integration tests for the `threatforge` binary.
//!
//! Drives a model file through the full command sequence and checks the
//! JSON output, the file on disk and the process exit codes.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn threatforge(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_threatforge"))
        .current_dir(dir)
        .env("RUST_LOG", "warn")
        .env("NO_COLOR", "1")
        .args(args)
        .output()
        .expect("should spawn threatforge")
}

fn json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_full_model_workflow() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let dir = temp_dir.path();

    // Given: a fresh model
    let created = json(&threatforge(
        dir,
        &["new", "shop.json", "--name", "Shop", "--output", "json"],
    ));
    assert_eq!(created["name"], "Shop");
    assert_eq!(created["nodes"], 0);

    // When: adding two components and connecting them
    let web = json(&threatforge(
        dir,
        &["add", "shop.json", "webApplication", "--output", "json"],
    ));
    let db = json(&threatforge(
        dir,
        &[
            "add",
            "shop.json",
            "database",
            "--x",
            "300",
            "--label",
            "Orders DB",
            "--output",
            "json",
        ],
    ));
    assert_eq!(web["threats"].as_array().map(Vec::len), Some(5));
    assert_eq!(db["label"], "Orders DB");

    let web_id = web["id"].as_str().expect("node id");
    let db_id = db["id"].as_str().expect("node id");
    let edge = json(&threatforge(
        dir,
        &[
            "connect",
            "shop.json",
            web_id,
            db_id,
            "--protocol",
            "TLS",
            "--encrypted",
            "--output",
            "json",
        ],
    ));
    assert_eq!(edge["source"], web_id);
    assert_eq!(edge["encrypted"], true);

    // Then: the summary reflects every derived threat
    let summary = json(&threatforge(
        dir,
        &["summary", "shop.json", "--output", "json"],
    ));
    assert_eq!(summary["modelName"], "Shop");
    assert_eq!(summary["nodes"], 2);
    assert_eq!(summary["edges"], 1);
    let total = summary["summary"]["totalThreats"].as_u64().expect("count");
    assert!(total >= 5);
    assert_eq!(summary["summary"]["mitigationCoverage"], 0);

    // And: the file on disk is a valid document
    let validated = json(&threatforge(
        dir,
        &["validate", "shop.json", "--output", "json"],
    ));
    assert_eq!(validated["valid"], true);
    assert_eq!(validated["nodes"], 2);
}

#[test]
fn test_template_then_tree() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let dir = temp_dir.path();

    json(&threatforge(dir, &["new", "m.json", "--output", "json"]));
    let placed = json(&threatforge(
        dir,
        &["template", "m.json", "threeTier", "--output", "json"],
    ));
    assert_eq!(placed["components"].as_array().map(Vec::len), Some(4));
    assert_eq!(placed["boundaries"], 2);
    assert_eq!(placed["edges"], 3);

    let web_id = placed["components"][1]["id"].as_str().expect("id");
    let tree = json(&threatforge(
        dir,
        &["tree", "m.json", web_id, "--output", "json"],
    ));
    assert_eq!(tree["tree"]["type"], "goal");
    assert_eq!(tree["tree"]["children"].as_array().map(Vec::len), Some(5));
    assert_eq!(tree["openPaths"], 5);
}

#[test]
fn test_demo_report_text() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let dir = temp_dir.path();

    let demo = threatforge(dir, &["demo", "demo.json"]);
    assert!(demo.status.success());

    let report = threatforge(dir, &["report", "demo.json", "--min-severity", "high"]);
    assert!(report.status.success());
    let text = String::from_utf8_lossy(&report.stdout);
    assert!(text.contains("Demo Architecture"));
    assert!(text.contains("SQL Injection"));
    assert!(text.contains("Mitigation coverage: 40%"));
}

#[test]
fn test_exit_codes() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let dir = temp_dir.path();

    // missing model file -> io error
    let missing = threatforge(dir, &["summary", "absent.json"]);
    assert_eq!(missing.status.code(), Some(10));

    // rejected document -> 3
    std::fs::write(
        dir.join("v9.json"),
        r#"{"metadata":{"name":"x","version":"9.0.0"},"diagram":{"nodes":[],"edges":[]}}"#,
    )
    .expect("write");
    let rejected = threatforge(dir, &["validate", "v9.json"]);
    assert_eq!(rejected.status.code(), Some(3));
    let loaded = threatforge(dir, &["summary", "v9.json"]);
    assert_eq!(loaded.status.code(), Some(3));

    // bad configuration -> 2
    std::fs::write(
        dir.join("threatforge.toml"),
        "[template]\nspacing_multiplier = 0.5\n",
    )
    .expect("write");
    let config = threatforge(dir, &["config", "validate"]);
    assert_eq!(config.status.code(), Some(2));
    let blocked = threatforge(dir, &["new", "x.json"]);
    assert_eq!(blocked.status.code(), Some(2));

    // unknown template -> command error
    std::fs::remove_file(dir.join("threatforge.toml")).expect("remove");
    json(&threatforge(dir, &["new", "t.json", "--output", "json"]));
    let template = threatforge(dir, &["template", "t.json", "fourTier"]);
    assert_eq!(template.status.code(), Some(1));
}

#[test]
fn test_catalog_json() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let listing = json(&threatforge(
        temp_dir.path(),
        &["catalog", "templates", "--output", "json"],
    ));
    let templates = listing["templates"].as_array().expect("array");
    assert_eq!(templates.len(), 6);
    assert_eq!(templates[0]["id"], "restApi");
}
