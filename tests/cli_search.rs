// SPDX-License-Identifier: MIT OR Apache-2.0

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/hamlet.txt")
}

/// Run the binary from an empty directory with no user config in reach.
fn shakesearch(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("shakesearch"));
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env("RUST_LOG", "warn");
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let home = TempDir::new().expect("tempdir");
    let fixture = fixture();
    let assert = shakesearch(&home)
        .args(["--format", "json", "--compact", "search"])
        .args(args)
        .arg("--corpus")
        .arg(&fixture)
        .assert()
        .success();
    serde_json::from_slice(&assert.get_output().stdout).expect("json output")
}

#[test]
fn text_search_prints_matching_passage() {
    let home = TempDir::new().expect("tempdir");
    shakesearch(&home)
        .args(["search", "To be, or not to be", "--corpus"])
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("To be, or not to be"));
}

#[test]
fn exact_strategy_returns_whole_lines() {
    let json = run_json(&["slings", "--strategy", "exact"]);
    assert_eq!(json["strategy"], "exact");
    assert_eq!(
        json["results"],
        serde_json::json!(["The slings and arrows of outrageous fortune,"])
    );
}

#[test]
fn fuzzy_strategy_tolerates_misspelling() {
    let json = run_json(&["hamlett", "--strategy", "fuzzy"]);
    assert_eq!(json["strategy"], "fuzzy");
    let results = json["results"].as_array().expect("results array");
    assert!(!results.is_empty());
    assert!(results
        .iter()
        .any(|r| r.as_str().unwrap_or_default().contains("Hamlet")));
}

#[test]
fn linguistic_strategy_folds_case() {
    let json = run_json(&["OPHELIA", "-s", "linguistic"]);
    assert_eq!(json["results"], serde_json::json!(["OPHELIA"]));
}

#[test]
fn no_match_yields_empty_results() {
    let json = run_json(&["zzzz"]);
    assert!(json["strategy"].is_null());
    assert_eq!(json["results"], serde_json::json!([]));
}

#[test]
fn no_match_in_text_mode_says_so() {
    let home = TempDir::new().expect("tempdir");
    shakesearch(&home)
        .args(["search", "zzzz", "--corpus"])
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found for 'zzzz'"));
}

#[test]
fn empty_query_is_rejected() {
    let home = TempDir::new().expect("tempdir");
    shakesearch(&home)
        .args(["search", "", "--corpus"])
        .arg(fixture())
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn missing_corpus_fails_with_path() {
    let home = TempDir::new().expect("tempdir");
    shakesearch(&home)
        .args(["search", "hamlet", "--corpus", "no-such-corpus.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-corpus.txt"));
}

#[test]
fn config_file_selects_corpus() {
    let home = TempDir::new().expect("tempdir");
    let config = format!(
        "corpus_path = {:?}\n\n[search]\nstrategies = [\"exact\"]\n",
        fixture().display().to_string()
    );
    std::fs::write(home.path().join(".shakesearch.toml"), config).expect("write config");

    let assert = shakesearch(&home)
        .args(["--format", "json", "--compact", "search", "OPHELIA."])
        .assert()
        .success();
    let json: Value = serde_json::from_slice(&assert.get_output().stdout).expect("json output");
    assert_eq!(json["strategy"], "exact");
    assert_eq!(json["results"], serde_json::json!(["OPHELIA."]));
}

#[test]
fn completions_generate_for_bash() {
    let home = TempDir::new().expect("tempdir");
    shakesearch(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shakesearch"));
}
