//! Secret read commands: get, rm, list and export.

use std::collections::BTreeMap;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::vault::Vault;
use crate::error::{FormatError, Result};

/// Print a decrypted secret.
pub fn get(vault: &Vault, name: &str) -> Result<()> {
    let value = vault.get_secret(name)?;
    // Plain output for scripting - no decoration
    println!("{}", value.as_str());
    Ok(())
}

/// Remove a secret.
pub fn rm(vault: &Vault, name: &str) -> Result<()> {
    vault.remove_entry(name)?;
    output::success(&format!("removed {}", output::key(name)));
    Ok(())
}

/// List secret names. Works with only the public key.
pub fn list(vault: &Vault, json: bool) -> Result<()> {
    let names = vault.list()?;

    if json {
        let result = serde_json::json!({
            "names": names,
            "count": names.len()
        });
        let rendered = serde_json::to_string_pretty(&result).map_err(FormatError::Serialize)?;
        println!("{}", rendered);
    } else if names.is_empty() {
        output::dimmed("no secrets stored");
    } else {
        output::header(&format!("{} secrets", names.len()));
        output::rule();
        for name in &names {
            output::list_item(name);
        }
    }

    Ok(())
}

/// Print every decrypted secret as a JSON object.
pub fn export(vault: &Vault) -> Result<()> {
    let secrets = vault.decrypt_all()?;
    let view: BTreeMap<&str, &str> = secrets
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let mut rendered =
        Zeroizing::new(serde_json::to_string_pretty(&view).map_err(FormatError::Serialize)?);
    rendered.push('\n');
    output::raw(&rendered);
    Ok(())
}
