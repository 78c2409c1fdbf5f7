//! Error reporting and global options.

use crate::support::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_tampered_entry_reports_generic_failure() {
    let t = Test::with_secrets(&[("KEY", "value")]);

    let contents = fs::read_to_string(t.secrets_file()).unwrap();
    let mut json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    let entry = json["KEY"].as_str().unwrap().to_string();
    let mut fields: Vec<String> = entry.split('.').map(str::to_string).collect();
    // Change the first ciphertext byte.
    fields[3] = if fields[3].starts_with('A') {
        format!("B{}", &fields[3][1..])
    } else {
        format!("A{}", &fields[3][1..])
    };
    json["KEY"] = serde_json::Value::String(fields.join("."));
    fs::write(t.secrets_file(), serde_json::to_string_pretty(&json).unwrap()).unwrap();

    let output = t.get("KEY");
    assert_failure(&output);
    assert_stderr_contains(&output, "unable to decrypt secret");
}

#[test]
fn test_corrupt_store_reports_format_error() {
    let t = Test::init();
    fs::write(t.secrets_file(), "[1, 2, 3]").unwrap();

    let output = t.list();
    assert_failure(&output);
    assert_stderr_contains(&output, "does not contain a valid JSON object");
}

#[test]
fn test_short_key_file_rejected() {
    let t = Test::init();
    fs::write(t.public_key_file(), [0u8; 31]).unwrap();

    let output = t.add("KEY", "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid key file");
}

#[test]
fn test_env_overrides_paths() {
    let t = Test::new();

    t.cmd()
        .arg("init")
        .env("CELLAR_SECRETS_FILE", "elsewhere/store.json")
        .assert()
        .success();

    assert!(t.dir.path().join("elsewhere/store.json").exists());
    assert!(!t.secrets_file().exists());
}

#[test]
fn test_unknown_config_key_rejected() {
    let t = Test::new();
    fs::write(t.dir.path().join(".cellar.toml"), "[vault]\nmaster_key = \"x\"\n").unwrap();

    t.cmd()
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::init();

    t.cmd()
        .args(["--verbose", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("loading secrets store"));
}

#[test]
fn test_completions() {
    Test::new()
        .cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cellar"));
}
