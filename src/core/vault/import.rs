//! Bulk import from a plaintext secrets document.

use std::fs;
use std::path::Path;

use tracing::info;
use zeroize::Zeroizing;

use super::edit::parse;
use super::Vault;
use crate::core::cipher;
use crate::core::store::Store;
use crate::core::validation::validate_name;
use crate::error::Result;

/// What an import wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub replaced: usize,
    /// Entries dropped because the import replaced the whole store.
    pub removed: usize,
}

impl Vault {
    /// Encrypt every entry of a plaintext JSON document into the store.
    ///
    /// The document is an object of name to string value. Only the public
    /// key is used, so a write-only vault can import. With `replace`, the
    /// store afterwards holds exactly the imported entries; otherwise they
    /// are merged over the existing ones.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDocument` for a malformed document
    /// and `ValidationError` for a bad name, both before the store is read.
    pub fn import(&self, path: &Path, replace: bool) -> Result<ImportSummary> {
        let document = Zeroizing::new(fs::read_to_string(path)?);
        let secrets = parse(&document, &path.display().to_string())?;
        for name in secrets.keys() {
            validate_name(name)?;
        }

        let _lock = self.lock()?;
        let ctx = self.validate(false)?;

        let mut summary = ImportSummary::default();
        let mut store = if replace {
            summary.removed = ctx
                .store
                .names()
                .iter()
                .filter(|name| !secrets.contains_key(*name))
                .count();
            Store::new()
        } else {
            ctx.store.clone()
        };

        for (name, value) in &secrets {
            let encrypted = cipher::encrypt(value, &ctx.public_key)?;
            if ctx.store.get(name).is_some() {
                summary.replaced += 1;
            } else {
                summary.added += 1;
            }
            store.insert(name.clone(), encrypted);
        }
        store.save(&self.paths.secrets_file)?;

        info!(
            source = %path.display(),
            added = summary.added,
            replaced = summary.replaced,
            removed = summary.removed,
            "imported secrets"
        );
        Ok(summary)
    }
}
