//! Import command - bulk-encrypt a plaintext secrets file.

use std::path::Path;

use crate::cli::output;
use crate::core::vault::Vault;
use crate::error::Result;

pub fn execute(vault: &Vault, file: &Path, replace: bool) -> Result<()> {
    let summary = vault.import(file, replace)?;

    output::success(&format!(
        "imported {}: {} added, {} replaced",
        output::path(file.display()),
        summary.added,
        summary.replaced
    ));
    if summary.removed > 0 {
        output::dimmed(&format!("{} existing secrets removed", summary.removed));
    }
    output::hint(&format!(
        "delete the plaintext file once it is no longer needed: {}",
        output::path(file.display())
    ));
    Ok(())
}
