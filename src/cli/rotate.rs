//! Rotate command - replace the key pair and re-encrypt all secrets.

use std::io::{self, IsTerminal};

use dialoguer::Confirm;

use crate::cli::output;
use crate::core::vault::Vault;
use crate::error::Result;

/// Rotate the vault key pair.
pub fn execute(vault: &Vault, yes: bool) -> Result<()> {
    if !yes && io::stdin().is_terminal() {
        output::warn("every holder of the current private key will lose access");
        let confirmed = Confirm::new()
            .with_prompt("Rotate the key pair?")
            .default(false)
            .interact()?;
        if !confirmed {
            output::dimmed("aborted, nothing was changed");
            return Ok(());
        }
    }

    let report = vault.rotate_key_pair()?;

    output::success(&format!("rotated key pair, re-encrypted {} secrets", report.secrets));
    output::kv("old", &report.old_fingerprint);
    output::kv("new", &report.new_fingerprint);
    output::hint("distribute the new private key to everyone who reads secrets");
    Ok(())
}
