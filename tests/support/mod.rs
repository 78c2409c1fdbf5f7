//! Test support utilities for cellar integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;

use cellar::core::config::VaultPaths;
use cellar::Vault;
use tempfile::TempDir;

/// Test environment with an isolated project directory.
///
/// No process-global state is mutated; child processes use `.current_dir()`
/// so tests can safely run in parallel.
pub struct Test {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl Test {
    /// Create a new empty test environment.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a test environment with the vault initialized.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize vault: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Create a test environment with the vault initialized and secrets added.
    pub fn with_secrets(secrets: &[(&str, &str)]) -> Self {
        let t = Self::init();
        for (name, value) in secrets {
            let output = t.add(name, value);
            assert!(
                output.status.success(),
                "Failed to add secret {}: {}",
                name,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        t
    }

    /// Default vault file locations inside the project directory.
    pub fn paths(&self) -> VaultPaths {
        VaultPaths::in_dir(self.dir.path())
    }

    /// Library handle on the same vault the binary uses.
    pub fn vault(&self) -> Vault {
        Vault::new(self.paths())
    }

    pub fn secrets_file(&self) -> PathBuf {
        self.paths().secrets_file
    }

    pub fn public_key_file(&self) -> PathBuf {
        self.paths().public_key_file
    }

    pub fn private_key_file(&self) -> PathBuf {
        self.dir.path().join(".cellar/private.key")
    }

    /// Raw bytes of the store and both key files, in that order.
    pub fn snapshot(&self) -> Vec<Vec<u8>> {
        [
            self.secrets_file(),
            self.public_key_file(),
            self.private_key_file(),
        ]
        .iter()
        .map(|p| fs::read(p).expect("failed to read vault file"))
        .collect()
    }
}
