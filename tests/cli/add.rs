//! Tests for `cellar add`.

use crate::support::*;
use std::fs;

#[test]
fn test_add_and_get() {
    let t = Test::init();
    assert_roundtrip(&t, "DATABASE_URL", "postgres://localhost/mydb");
}

#[test]
fn test_add_from_stdin_strips_newline() {
    let t = Test::init();

    assert_success(&t.add_stdin("TOKEN", "piped-value\n"));
    assert_eq!(stdout(&t.get("TOKEN")), "piped-value\n");
}

#[test]
fn test_add_multiline_from_stdin() {
    let t = Test::init();

    assert_success(&t.add_stdin("CERT", "line one\nline two\n"));
    assert_eq!(stdout(&t.get("CERT")), "line one\nline two\n");
}

#[test]
fn test_add_overwrites_existing() {
    let t = Test::with_secrets(&[("KEY", "first")]);

    assert_success(&t.add("KEY", "second"));
    assert_eq!(stdout(&t.get("KEY")), "second\n");
}

#[test]
fn test_add_invalid_names_leave_store_untouched() {
    let t = Test::with_secrets(&[("KEEP", "value")]);
    let before = fs::read(t.secrets_file()).unwrap();

    for name in INVALID_NAMES {
        let output = t.add(name, "value");
        assert_failure(&output);
        assert_stderr_contains(&output, "secret name");
    }

    assert_eq!(fs::read(t.secrets_file()).unwrap(), before);
}

#[test]
fn test_add_with_public_key_only() {
    let t = Test::init();
    fs::remove_file(t.private_key_file()).unwrap();

    let output = t
        .cmd()
        .args(["add", "FROM_CI", "token"])
        .env("CELLAR_PRIVATE_KEY", "absent.key")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.vault().list().unwrap().contains(&"FROM_CI".to_string()));
}

#[test]
fn test_add_before_init_fails_with_hint() {
    let t = Test::new();

    let output = t.add("KEY", "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "secrets file not found");
    assert_stderr_contains(&output, "cellar init");
}
