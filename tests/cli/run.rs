//! Tests for `cellar run`.

use crate::support::*;

#[cfg(unix)]
#[test]
fn test_run_resolves_secret_references() {
    let t = Test::with_secrets(&[("DB_URL", "postgres://db")]);

    let output = t
        .cmd()
        .args(["run", "--", "sh", "-c", "printf %s \"$DATABASE_URL|$PLAIN\""])
        .env("DATABASE_URL", "secret:DB_URL")
        .env("PLAIN", "literal")
        .output()
        .unwrap();

    assert_success(&output);
    assert_eq!(stdout(&output), "postgres://db|literal");
}

#[cfg(unix)]
#[test]
fn test_run_passthrough_reads_environment() {
    let t = Test::new();

    let output = t
        .cmd()
        .args(["run", "--passthrough", "--", "sh", "-c", "printf %s \"$TOKEN\""])
        .env("TOKEN", "secret:RAW_TOKEN")
        .env("RAW_TOKEN", "from-env")
        .output()
        .unwrap();

    assert_success(&output);
    assert_eq!(stdout(&output), "from-env");
}

#[cfg(unix)]
#[test]
fn test_run_propagates_exit_code() {
    let t = Test::init();

    let output = t.cmd().args(["run", "--", "sh", "-c", "exit 7"]).output().unwrap();
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_run_unknown_secret_fails() {
    let t = Test::init();

    let output = t
        .cmd()
        .args(["run", "--", "true"])
        .env("MISSING", "secret:NOPE")
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "secret not found: NOPE");
}

#[cfg(unix)]
#[test]
fn test_run_tolerates_non_utf8_environment() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let t = Test::with_secrets(&[("DB_URL", "postgres://db")]);

    let output = t
        .cmd()
        .args([
            "run",
            "--",
            "sh",
            "-c",
            "test -n \"$UNRELATED_BIN\" && printf %s \"$DATABASE_URL\"",
        ])
        .env("UNRELATED_BIN", OsStr::from_bytes(b"\xff\xfe"))
        .env("DATABASE_URL", "secret:DB_URL")
        .output()
        .unwrap();

    assert_success(&output);
    assert_eq!(stdout(&output), "postgres://db");
}
