//! Edit command.

use crate::cli::output;
use crate::core::editor::SystemEditor;
use crate::core::vault::Vault;
use crate::error::Result;

/// Open every secret in the user's editor and save the result.
pub fn execute(vault: &Vault, editor: Option<String>) -> Result<()> {
    let editor = SystemEditor::from_env(editor)?;
    let summary = vault.edit(&editor)?;

    if summary.is_unchanged() {
        output::dimmed("no changes");
        return Ok(());
    }

    output::success(&format!(
        "saved secrets: {} added, {} updated, {} removed",
        summary.added, summary.updated, summary.removed
    ));
    Ok(())
}
