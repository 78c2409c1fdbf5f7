//! Tests for `cellar rotate`.

use crate::support::*;
use std::fs;

#[test]
fn test_rotate_keeps_secrets_readable() {
    let t = Test::with_secrets(STANDARD_SECRETS);
    let old_private = fs::read(t.private_key_file()).unwrap();

    let output = t.rotate();
    assert_success(&output);
    assert_stderr_contains(&output, "re-encrypted 5 secrets");

    for (name, value) in STANDARD_SECRETS {
        assert_eq!(stdout(&t.get(name)), format!("{}\n", value));
    }
    assert_ne!(fs::read(t.private_key_file()).unwrap(), old_private);
}

#[test]
fn test_old_private_key_stops_working() {
    let t = Test::with_secrets(&[("KEY", "value")]);
    let old_private = t.dir.path().join("old-private.key");
    let old_public = t.dir.path().join("old-public.key");
    fs::copy(t.private_key_file(), &old_private).unwrap();
    fs::copy(t.public_key_file(), &old_public).unwrap();

    assert_success(&t.rotate());

    // Old pair as a whole: valid pair, but entries were sealed to the new key.
    let output = t
        .cmd()
        .args(["get", "KEY"])
        .env("CELLAR_PUBLIC_KEY", &old_public)
        .env("CELLAR_PRIVATE_KEY", &old_private)
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "unable to decrypt");

    // Old private key with the new public key: not a pair.
    let output = t
        .cmd()
        .args(["get", "KEY"])
        .env("CELLAR_PRIVATE_KEY", &old_private)
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "does not belong to public key");
}

#[test]
fn test_rotate_requires_private_key() {
    let t = Test::with_secrets(&[("KEY", "value")]);
    let before = t.snapshot();

    let output = t
        .cmd()
        .args(["rotate", "--yes", "--private-key", "missing.key"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "during snapshot");
    assert_eq!(t.snapshot(), before);
}
