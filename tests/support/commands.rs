//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a cellar command isolated to the test directory.
    ///
    /// Environment overrides from the developer's shell are removed so the
    /// binary always falls back to the default file layout.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("cellar").expect("failed to find cellar binary");
        cmd.current_dir(self.dir.path())
            .env_remove("CELLAR_SECRETS_FILE")
            .env_remove("CELLAR_PUBLIC_KEY")
            .env_remove("CELLAR_PRIVATE_KEY")
            .env_remove("CELLAR_LOG")
            .env_remove("VISUAL")
            .env_remove("EDITOR")
            .env("NO_COLOR", "1");
        cmd
    }

    /// Shortcut for `cellar init`.
    pub fn init_cmd(&self) -> Output {
        self.cmd()
            .arg("init")
            .output()
            .expect("failed to run cellar init")
    }

    /// Shortcut for `cellar add NAME VALUE`.
    pub fn add(&self, name: &str, value: &str) -> Output {
        self.cmd()
            .args(["add", name, value])
            .output()
            .expect("failed to run cellar add")
    }

    /// `cellar add NAME` with the value piped on stdin.
    pub fn add_stdin(&self, name: &str, input: &str) -> Output {
        self.cmd()
            .args(["add", name])
            .write_stdin(input)
            .output()
            .expect("failed to run cellar add")
    }

    /// Shortcut for `cellar get`.
    pub fn get(&self, name: &str) -> Output {
        self.cmd()
            .args(["get", name])
            .output()
            .expect("failed to run cellar get")
    }

    /// Shortcut for `cellar rm`.
    pub fn rm(&self, name: &str) -> Output {
        self.cmd()
            .args(["rm", name])
            .output()
            .expect("failed to run cellar rm")
    }

    /// Shortcut for `cellar list`.
    pub fn list(&self) -> Output {
        self.cmd()
            .arg("list")
            .output()
            .expect("failed to run cellar list")
    }

    /// Shortcut for `cellar list --json`.
    pub fn list_json(&self) -> Output {
        self.cmd()
            .args(["list", "--json"])
            .output()
            .expect("failed to run cellar list --json")
    }

    /// Shortcut for `cellar export`.
    pub fn export(&self) -> Output {
        self.cmd()
            .arg("export")
            .output()
            .expect("failed to run cellar export")
    }

    /// Shortcut for `cellar import FILE`.
    pub fn import(&self, file: &str) -> Output {
        self.cmd()
            .args(["import", file])
            .output()
            .expect("failed to run cellar import")
    }

    /// Shortcut for `cellar rotate --yes`.
    pub fn rotate(&self) -> Output {
        self.cmd()
            .args(["rotate", "--yes"])
            .output()
            .expect("failed to run cellar rotate")
    }

    /// Shortcut for `cellar status`.
    pub fn status(&self) -> Output {
        self.cmd()
            .arg("status")
            .output()
            .expect("failed to run cellar status")
    }
}
