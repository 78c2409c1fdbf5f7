//! Secrets store file.
//!
//! The store is a pretty-printed JSON object mapping secret names to
//! serialized envelopes. It is always replaced as a whole: the new contents
//! go to a temporary file in the same directory, which is synced and then
//! renamed over the old file, so readers see either the old store or the new
//! one.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::types::{EncryptedValue, SecretName};
use crate::error::{ConfigError, FormatError, Result};

/// In-memory copy of the store file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    entries: BTreeMap<SecretName, EncryptedValue>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and parse the store file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingStore` if the file doesn't exist and
    /// `FormatError::InvalidStore` unless it holds a JSON object of strings.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading secrets store");

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::MissingStore(path.to_path_buf()).into());
            }
            Err(e) => return Err(e.into()),
        };

        let store = Self::parse(&contents).map_err(|source| FormatError::InvalidStore {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(entries = store.len(), "secrets store loaded");
        Ok(store)
    }

    /// Parse store contents.
    pub fn parse(contents: &str) -> std::result::Result<Self, serde_json::Error> {
        let entries: BTreeMap<SecretName, EncryptedValue> = serde_json::from_str(contents)?;
        Ok(Self { entries })
    }

    /// Serialize as pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.entries).map_err(FormatError::Serialize)?;
        json.push('\n');
        Ok(json)
    }

    /// Atomically replace the store file with this store.
    pub fn save(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), entries = self.len(), "saving secrets store");
        write_atomic(path, self.to_json()?.as_bytes(), 0o644)
    }

    pub fn get(&self, name: &str) -> Option<&EncryptedValue> {
        self.entries.get(name)
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, name: SecretName, value: EncryptedValue) -> Option<EncryptedValue> {
        self.entries.insert(name, value)
    }

    pub fn remove(&mut self, name: &str) -> Option<EncryptedValue> {
        self.entries.remove(name)
    }

    /// Sorted secret names.
    pub fn names(&self) -> Vec<SecretName> {
        self.entries.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SecretName, &EncryptedValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Replace `path` with `contents` via a synced temp file and rename.
///
/// Missing parent directories are created. `mode` applies on Unix only.
pub(crate) fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(tmp.path(), fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.persist(path)?;
    debug!(path = %path.display(), bytes = contents.len(), "replaced file");
    Ok(())
}
