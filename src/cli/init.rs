//! Init command - create the vault files.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;
use tracing::info;

use crate::cli::output;
use crate::core::keys;
use crate::core::vault::Vault;
use crate::error::Result;

/// Initialize the vault, asking before replacing existing files.
pub fn execute(vault: &Vault, force: bool) -> Result<()> {
    let pair = match vault.initialize(force) {
        Ok(pair) => pair,
        Err(e) => {
            if e.conflicting_paths().is_none() {
                return Err(e);
            }

            output::warn("vault files already exist:");
            for path in e.conflicting_paths().unwrap_or_default() {
                output::item(&output::path(path.display()));
            }
            if !io::stdin().is_terminal() {
                return Err(e);
            }

            let confirmed = Confirm::new()
                .with_prompt("Overwrite them? Existing secrets will no longer decrypt")
                .default(false)
                .interact()?;
            if !confirmed {
                output::dimmed("aborted, nothing was changed");
                return Ok(());
            }

            info!("overwriting existing vault files");
            vault.initialize(true)?
        }
    };

    let paths = vault.paths();
    output::success("initialized vault");
    output::kv("secrets", output::path(paths.secrets_file.display()));
    output::kv("public key", output::path(paths.public_key_file.display()));
    if let Some(private) = &paths.private_key_file {
        output::kv("private key", output::path(private.display()));
    }
    output::kv("fingerprint", keys::fingerprint(pair.public()));
    output::hint("commit the store and public key; never commit the private key");

    Ok(())
}
