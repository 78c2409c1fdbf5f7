//! Quick status overview command.

use std::path::Path;

use crate::cli::output;
use crate::core::cipher;
use crate::core::keys;
use crate::core::lock::lock_path;
use crate::core::vault::Vault;
use crate::error::Result;

/// Show vault files, key fingerprint and secret count.
///
/// Problems are reported inline rather than as errors, so status is useful
/// on a broken vault too.
pub fn execute(vault: &Vault) -> Result<()> {
    let paths = vault.paths();

    output::header("Cellar Status");
    output::rule();
    output::kv("secrets", file_state(&paths.secrets_file));
    output::kv("public key", file_state(&paths.public_key_file));
    match &paths.private_key_file {
        Some(private) => output::kv("private key", file_state(private)),
        None => output::kv("private key", "not configured (write-only)"),
    }
    output::kv("lock", output::path(lock_path(&paths.secrets_file).display()));
    let state = if vault.is_initialized() {
        "✓ initialized"
    } else if paths.private_key_file.is_none() {
        "write-only"
    } else {
        "✗ incomplete"
    };
    output::kv("state", state);

    if !paths.secrets_file.exists() {
        output::rule();
        output::hint(&format!("run: {}", output::cmd("cellar init")));
        return Ok(());
    }

    output::rule();
    match vault.validate(false) {
        Ok(ctx) => {
            output::kv("entries", ctx.store.len());
            output::kv("fingerprint", keys::fingerprint(&ctx.public_key));
        }
        Err(e) => output::kv("store", format!("✗ {}", e)),
    }

    if paths.private_key_file.is_some() {
        let state = match vault.validate(true) {
            Ok(_) => "✓ matches public key".to_string(),
            Err(e) => format!("✗ {}", e),
        };
        output::kv("key pair", state);
    }

    let cipher_state = match cipher::ensure_available() {
        Ok(()) => "✓ available".to_string(),
        Err(e) => format!("✗ {}", e),
    };
    output::kv("cipher", cipher_state);

    Ok(())
}

fn file_state(path: &Path) -> String {
    let state = if path.is_file() { "✓" } else { "✗ missing" };
    format!("{} {}", output::path(path.display()), state)
}
