//! Tests for `cellar init`.

use crate::support::*;
use std::fs;

#[test]
fn test_init_creates_vault_files() {
    let t = Test::new();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stderr_contains(&output, "initialized vault");
    assert_stderr_contains(&output, "fingerprint");

    assert_eq!(fs::read_to_string(t.secrets_file()).unwrap(), "{}\n");
    assert_eq!(fs::read(t.public_key_file()).unwrap().len(), 32);
    assert_eq!(fs::read(t.private_key_file()).unwrap().len(), 32);
}

#[cfg(unix)]
#[test]
fn test_init_private_key_mode() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::init();
    let mode = fs::metadata(t.private_key_file()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_init_twice_refuses_without_force() {
    let t = Test::init();
    let before = t.snapshot();

    let output = t.init_cmd();
    assert_failure(&output);
    assert_stderr_contains(&output, "refusing to overwrite existing files");
    assert_stderr_contains(&output, "cellar init --force");

    assert_eq!(t.snapshot(), before);
}

#[test]
fn test_init_force_replaces_keys() {
    let t = Test::init();
    let before = t.snapshot();

    let output = t.cmd().args(["init", "--force"]).output().unwrap();
    assert_success(&output);

    let after = t.snapshot();
    assert_ne!(after[1], before[1], "public key should change");
    assert_eq!(after[0], b"{}\n");
}

#[test]
fn test_init_with_one_existing_file_lists_it() {
    let t = Test::new();
    fs::create_dir_all(t.dir.path().join(".cellar")).unwrap();
    fs::write(t.public_key_file(), b"stale").unwrap();

    let output = t.init_cmd();
    assert_failure(&output);
    assert_stderr_contains(&output, "public.key");
    assert!(!t.secrets_file().exists());
}

#[test]
fn test_init_conflicts_are_reported_on_stderr() {
    let t = Test::init();

    let output = t.init_cmd();
    assert_failure(&output);
    assert_eq!(stdout(&output), "");
    assert_stderr_contains(&output, "vault files already exist");
    assert_stderr_contains(&output, "• ");
    assert_stderr_contains(&output, "private.key");
}

#[test]
fn test_init_uses_config_paths() {
    let t = Test::new();
    fs::write(
        t.dir.path().join(".cellar.toml"),
        "[vault]\nsecrets_file = \"config/secrets.json\"\nprivate_key_file = \"keys/private.key\"\n",
    )
    .unwrap();

    assert_success(&t.init_cmd());
    assert!(t.dir.path().join("config/secrets.json").exists());
    assert!(t.dir.path().join("keys/private.key").exists());
    assert!(t.public_key_file().exists());
}
