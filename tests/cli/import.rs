//! Tests for `cellar import`.

use crate::support::*;
use std::fs;

#[test]
fn test_import_encrypts_every_entry() {
    let t = Test::with_secrets(&[("KEEP", "kept")]);
    fs::write(
        t.dir.path().join("plain.json"),
        r#"{"DB_URL": "postgres://db", "API_KEY": "sk-1"}"#,
    )
    .unwrap();

    let output = t.import("plain.json");
    assert_success(&output);
    assert_stderr_contains(&output, "2 added, 0 replaced");

    assert_eq!(stdout(&t.get("DB_URL")).trim_end(), "postgres://db");
    assert_eq!(stdout(&t.get("KEEP")).trim_end(), "kept");
    let contents = fs::read_to_string(t.secrets_file()).unwrap();
    assert!(!contents.contains("postgres"));
}

#[test]
fn test_import_replace_matches_document() {
    let t = Test::with_secrets(&[("STALE", "old")]);
    fs::write(t.dir.path().join("plain.json"), r#"{"FRESH": "new"}"#).unwrap();

    let output = t
        .cmd()
        .args(["import", "plain.json", "--replace"])
        .output()
        .unwrap();
    assert_success(&output);

    let output = t.list();
    assert_stdout_contains(&output, "FRESH");
    assert_stdout_excludes(&output, "STALE");
}

#[test]
fn test_import_in_write_only_vault() {
    let t = Test::init();
    let private = fs::read(t.private_key_file()).unwrap();
    fs::remove_file(t.private_key_file()).unwrap();
    fs::write(
        t.dir.path().join(".cellar.toml"),
        "[vault]\nprivate_key_file = \"\"\n",
    )
    .unwrap();
    fs::write(t.dir.path().join("plain.json"), r#"{"CI_TOKEN": "abc"}"#).unwrap();

    assert_success(&t.import("plain.json"));

    fs::write(t.private_key_file(), private).unwrap();
    assert_eq!(t.vault().get_secret("CI_TOKEN").unwrap().as_str(), "abc");
}

#[test]
fn test_import_invalid_name_changes_nothing() {
    let t = Test::with_secrets(&[("KEEP", "kept")]);
    let before = t.snapshot();
    fs::write(
        t.dir.path().join("plain.json"),
        r#"{"GOOD": "x", "bad name": "y"}"#,
    )
    .unwrap();

    let output = t.import("plain.json");
    assert_failure(&output);
    assert_stderr_contains(&output, "bad name");
    assert_eq!(t.snapshot(), before);
}

#[test]
fn test_import_missing_file_fails() {
    let t = Test::init();
    assert_failure(&t.import("nope.json"));
}
