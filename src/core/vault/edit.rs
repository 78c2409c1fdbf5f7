//! Edit all secrets at once in an external editor.
//!
//! The secrets are decrypted into a temporary JSON document, the editor runs
//! on it, and the result replaces the store. The plaintext file is zeroed
//! and deleted however the edit ends.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::Vault;
use crate::core::cipher;
use crate::core::editor::Editor;
use crate::core::store::Store;
use crate::core::types::SecretName;
use crate::core::validation::validate_name;
use crate::error::{FormatError, Result, ValidationError};

/// What an edit changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl EditSummary {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.removed == 0
    }
}

impl Vault {
    /// Let the user edit every secret in `editor`, then re-encrypt.
    ///
    /// Entries whose value is unchanged keep their existing envelope. The
    /// vault lock is held while the editor runs.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidDocument` if the edited file is not
    /// a JSON object of strings and `ValidationError` for a bad name. The
    /// store is untouched in both cases.
    pub fn edit(&self, editor: &dyn Editor) -> Result<EditSummary> {
        let _lock = self.lock()?;
        let ctx = self.validate(true)?;
        let pair = ctx.key_pair()?;

        let mut current = BTreeMap::new();
        for (name, encrypted) in ctx.store.iter() {
            current.insert(name.clone(), cipher::decrypt(encrypted, pair)?);
        }

        let edited = {
            let file = PlaintextFile::create(&render(&current)?)?;
            editor.edit(file.path())?;
            file.read()?
        };
        let edited = parse(&edited, "edited file")?;

        for name in edited.keys() {
            validate_name(name)?;
        }

        let mut summary = EditSummary::default();
        let mut store = Store::new();
        for (name, value) in &edited {
            let encrypted = match (current.get(name), ctx.store.get(name)) {
                (Some(old), Some(existing)) if old.as_str() == value.as_str() => {
                    summary.unchanged += 1;
                    existing.clone()
                }
                (old, _) => {
                    if old.is_some() {
                        summary.updated += 1;
                    } else {
                        summary.added += 1;
                    }
                    cipher::encrypt(value, &ctx.public_key)?
                }
            };
            store.insert(name.clone(), encrypted);
        }
        summary.removed = current.keys().filter(|n| !edited.contains_key(*n)).count();

        if summary.is_unchanged() {
            debug!("edit made no changes");
            return Ok(summary);
        }

        store.save(&self.paths.secrets_file)?;
        info!(
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            "saved edited secrets"
        );
        Ok(summary)
    }
}

fn render(secrets: &BTreeMap<SecretName, Zeroizing<String>>) -> Result<Zeroizing<String>> {
    let view: BTreeMap<&str, &str> = secrets
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();

    let mut json = serde_json::to_string_pretty(&view).map_err(FormatError::Serialize)?;
    json.push('\n');
    Ok(Zeroizing::new(json))
}

/// Parse a plaintext `{"NAME": "value"}` document; `source` names it in errors.
pub(super) fn parse(
    document: &str,
    source: &str,
) -> Result<BTreeMap<SecretName, Zeroizing<String>>> {
    let parsed: BTreeMap<SecretName, String> = serde_json::from_str(document)
        .map_err(|e| ValidationError::InvalidDocument(source.to_string(), e.to_string()))?;

    Ok(parsed
        .into_iter()
        .map(|(name, value)| (name, Zeroizing::new(value)))
        .collect())
}

/// Temporary file holding decrypted secrets.
///
/// Zero-filled on drop, then removed by `NamedTempFile`.
struct PlaintextFile {
    file: NamedTempFile,
}

impl PlaintextFile {
    fn create(contents: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("cellar-edit-")
            .suffix(".json")
            .tempfile()?;
        file.write_all(contents.as_bytes())?;
        file.as_file().sync_all()?;

        debug!(path = %file.path().display(), "wrote plaintext for editing");
        Ok(Self { file })
    }

    fn path(&self) -> &Path {
        self.file.path()
    }

    /// Read by path: editors that save by rename replace the inode.
    fn read(&self) -> Result<Zeroizing<String>> {
        Ok(Zeroizing::new(fs::read_to_string(self.path())?))
    }
}

impl Drop for PlaintextFile {
    fn drop(&mut self) {
        if let Err(e) = wipe(self.path()) {
            warn!(path = %self.path().display(), error = %e, "failed to wipe plaintext file");
        }
    }
}

fn wipe(path: &Path) -> io::Result<()> {
    let len = fs::metadata(path)?.len();
    let mut file = OpenOptions::new().write(true).open(path)?;

    let zeros = [0u8; 4096];
    let mut remaining = len;
    while remaining > 0 {
        let n = remaining.min(zeros.len() as u64) as usize;
        file.write_all(&zeros[..n])?;
        remaining -= n as u64;
    }
    file.sync_all()
}
