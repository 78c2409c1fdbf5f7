//! Secret operations.
//!
//! Add, read, list and remove encrypted secrets.

use std::collections::BTreeMap;

use tracing::{debug, info};
use zeroize::Zeroizing;

use super::Vault;
use crate::core::cipher;
use crate::core::types::SecretName;
use crate::core::validation::validate_name;
use crate::error::{Result, SecretError};

impl Vault {
    /// Encrypt and store a secret, replacing any previous value.
    ///
    /// The name is validated before any file is touched. The store is then
    /// reloaded under the vault lock and written back as a whole.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for a bad name, `ConfigError`/`FormatError`
    /// if the vault files are unusable, and `Error::Locked` if another
    /// process holds the vault.
    pub fn add_entry(&self, name: &str, plaintext: &str) -> Result<()> {
        validate_name(name)?;

        let _lock = self.lock()?;
        let mut ctx = self.validate(false)?;

        let encrypted = cipher::encrypt(plaintext, &ctx.public_key)?;
        let replaced = ctx.store.insert(name.to_string(), encrypted).is_some();
        ctx.store.save(&self.paths.secrets_file)?;

        info!(name, replaced, "stored secret");
        Ok(())
    }

    /// Decrypt a single secret.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoPrivateKey` without a private key,
    /// `SecretError::NotFound` for an unknown name and
    /// `CipherError::DecryptionFailed` if the entry does not open.
    pub fn get_secret(&self, name: &str) -> Result<Zeroizing<String>> {
        let ctx = self.validate(true)?;

        let encrypted = ctx.store.get(name).ok_or_else(|| {
            SecretError::not_found_with_suggestions(name.to_string(), &ctx.store.names())
        })?;

        debug!(name, "decrypting secret");
        cipher::decrypt(encrypted, ctx.key_pair()?)
    }

    /// Sorted names of all stored secrets. Needs only the public key.
    pub fn list(&self) -> Result<Vec<SecretName>> {
        Ok(self.validate(false)?.store.names())
    }

    /// Decrypt every secret.
    ///
    /// Fails on the first entry that does not open; no partial map is
    /// returned.
    pub fn decrypt_all(&self) -> Result<BTreeMap<SecretName, Zeroizing<String>>> {
        let ctx = self.validate(true)?;
        let pair = ctx.key_pair()?;

        let mut plaintexts = BTreeMap::new();
        for (name, encrypted) in ctx.store.iter() {
            plaintexts.insert(name.clone(), cipher::decrypt(encrypted, pair)?);
        }

        debug!(count = plaintexts.len(), "decrypted all secrets");
        Ok(plaintexts)
    }

    /// Remove a secret.
    ///
    /// # Errors
    ///
    /// Returns `SecretError::NotFound` if the name doesn't exist.
    pub fn remove_entry(&self, name: &str) -> Result<()> {
        let _lock = self.lock()?;
        let mut ctx = self.validate(false)?;

        if ctx.store.remove(name).is_none() {
            return Err(
                SecretError::not_found_with_suggestions(name.to_string(), &ctx.store.names())
                    .into(),
            );
        }
        ctx.store.save(&self.paths.secrets_file)?;

        info!(name, "removed secret");
        Ok(())
    }
}
