//! Configuration file management.
//!
//! Vault paths come from three layers, highest first: explicit overrides
//! (CLI flags or `CELLAR_*` environment variables), `.cellar.toml`, and
//! built-in defaults. Relative paths in a config file resolve against the
//! directory containing that file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Contents of `.cellar.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultSection,
}

/// The `[vault]` table. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VaultSection {
    pub secrets_file: Option<PathBuf>,
    pub public_key_file: Option<PathBuf>,
    pub private_key_file: Option<PathBuf>,
    pub lock_timeout_secs: Option<u64>,
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub secrets_file: Option<PathBuf>,
    pub public_key_file: Option<PathBuf>,
    pub private_key_file: Option<PathBuf>,
}

/// Resolved locations of the vault files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub secrets_file: PathBuf,
    pub public_key_file: PathBuf,
    /// Absent for write-only producers.
    pub private_key_file: Option<PathBuf>,
    pub lock_timeout: Duration,
}

impl VaultPaths {
    /// Paths rooted at `dir` using the default file names.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            secrets_file: dir.join(constants::DEFAULT_SECRETS_FILE),
            public_key_file: dir.join(constants::DEFAULT_PUBLIC_KEY_FILE),
            private_key_file: Some(dir.join(constants::DEFAULT_PRIVATE_KEY_FILE)),
            lock_timeout: Duration::from_secs(constants::DEFAULT_LOCK_TIMEOUT_SECS),
        }
    }

    /// Same paths without the private key, as a write-only producer sees them.
    pub fn without_private_key(mut self) -> Self {
        self.private_key_file = None;
        self
    }

    /// All files `initialize` would create.
    pub fn managed_files(&self) -> Vec<&Path> {
        let mut files = vec![self.secrets_file.as_path(), self.public_key_file.as_path()];
        if let Some(private) = &self.private_key_file {
            files.push(private.as_path());
        }
        files
    }
}

impl Config {
    /// Path to the configuration file in the current directory.
    pub fn config_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values that can never work.
    pub fn validate(&self) -> Result<()> {
        let empty = |p: &Option<PathBuf>| p.as_ref().is_some_and(|p| p.as_os_str().is_empty());

        if empty(&self.vault.secrets_file) {
            return Err(ConfigError::InvalidValue {
                field: "secrets_file",
                reason: "path is empty".to_string(),
            }
            .into());
        }
        if empty(&self.vault.public_key_file) {
            return Err(ConfigError::InvalidValue {
                field: "public_key_file",
                reason: "path is empty".to_string(),
            }
            .into());
        }
        if self.vault.lock_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "lock_timeout_secs",
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Merge this file's settings with defaults rooted at `base`.
    ///
    /// An empty `private_key_file` marks a write-only setup.
    pub fn paths(&self, base: &Path) -> VaultPaths {
        let defaults = VaultPaths::in_dir(base);
        let resolve = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };

        let private_key_file = match &self.vault.private_key_file {
            Some(p) if p.as_os_str().is_empty() => None,
            Some(p) => Some(resolve(p)),
            None => defaults.private_key_file,
        };

        VaultPaths {
            secrets_file: self
                .vault
                .secrets_file
                .as_ref()
                .map(resolve)
                .unwrap_or(defaults.secrets_file),
            public_key_file: self
                .vault
                .public_key_file
                .as_ref()
                .map(resolve)
                .unwrap_or(defaults.public_key_file),
            private_key_file,
            lock_timeout: self
                .vault
                .lock_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.lock_timeout),
        }
    }
}

/// Resolve vault paths for the current directory.
///
/// Reads `overrides.config_file` if given (it must exist), otherwise
/// `.cellar.toml` when present, then applies the overrides on top.
pub fn resolve(overrides: &Overrides) -> Result<VaultPaths> {
    let (config, base) = match &overrides.config_file {
        Some(path) => (Config::load(path)?, parent_dir(path)),
        None => {
            let path = Config::config_path();
            if path.exists() {
                (Config::load(&path)?, PathBuf::new())
            } else {
                (Config::default(), PathBuf::new())
            }
        }
    };

    let mut paths = config.paths(&base);
    if let Some(p) = &overrides.secrets_file {
        paths.secrets_file = p.clone();
    }
    if let Some(p) = &overrides.public_key_file {
        paths.public_key_file = p.clone();
    }
    if let Some(p) = &overrides.private_key_file {
        paths.private_key_file = Some(p.clone());
    }

    debug!(
        secrets = %paths.secrets_file.display(),
        public_key = %paths.public_key_file.display(),
        private_key = ?paths.private_key_file,
        "resolved vault paths"
    );
    Ok(paths)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
