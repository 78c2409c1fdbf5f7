//! The primary interface for cellar operations.
//!
//! A `Vault` only knows where its files live. Every operation starts by
//! building a fresh [`Context`] from the files on disk, so nothing is cached
//! between calls and a call never observes half-loaded key state.

mod edit;
mod import;
mod rotation;
mod secrets;

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::core::cipher::PublicKey;
use crate::core::config::{self, Overrides, VaultPaths};
use crate::core::keys::{self, KeyPair};
use crate::core::lock::VaultLock;
use crate::core::store::Store;
use crate::error::{ConfigError, Error, Result};

pub use edit::EditSummary;
pub use import::ImportSummary;
pub use rotation::{Phase, RotationReport};

/// Handle to a vault: the secrets store plus its key files.
#[derive(Debug, Clone)]
pub struct Vault {
    paths: VaultPaths,
}

/// State loaded and validated for a single operation.
pub struct Context {
    pub store: Store,
    pub public_key: PublicKey,
    /// Present only when the operation asked for the private key.
    pub key_pair: Option<KeyPair>,
}

impl Context {
    /// Key pair, or `ConfigError::NoPrivateKey` for a public-only context.
    pub fn key_pair(&self) -> Result<&KeyPair> {
        self.key_pair
            .as_ref()
            .ok_or_else(|| ConfigError::NoPrivateKey.into())
    }
}

impl Vault {
    // --- Construction ---

    /// Vault over explicit paths.
    pub fn new(paths: VaultPaths) -> Self {
        Self { paths }
    }

    /// Vault using `.cellar.toml` and the given overrides.
    ///
    /// Only resolves paths; no vault file has to exist yet.
    pub fn open(overrides: &Overrides) -> Result<Self> {
        Ok(Self::new(config::resolve(overrides)?))
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    fn private_key_path(&self) -> Result<&PathBuf> {
        self.paths
            .private_key_file
            .as_ref()
            .ok_or_else(|| ConfigError::NoPrivateKey.into())
    }

    pub(crate) fn lock(&self) -> Result<VaultLock> {
        VaultLock::acquire(&self.paths.secrets_file, self.paths.lock_timeout)
    }

    // --- Validation ---

    /// Check the vault files and load them for one operation.
    ///
    /// The store must parse and the public key must be valid. With
    /// `require_private_key`, the private key must also be configured, valid,
    /// and match the public key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for missing or invalid files and `FormatError`
    /// for an unparseable store.
    pub fn validate(&self, require_private_key: bool) -> Result<Context> {
        let store = Store::load(&self.paths.secrets_file)?;

        let (public_key, key_pair) = if require_private_key {
            let pair =
                keys::load_key_pair(&self.paths.public_key_file, self.private_key_path()?)?;
            (pair.public().clone(), Some(pair))
        } else {
            (keys::load_public_key(&self.paths.public_key_file)?, None)
        };

        Ok(Context {
            store,
            public_key,
            key_pair,
        })
    }

    // --- Lifecycle ---

    /// Create an empty store and a fresh key pair.
    ///
    /// Without `overwrite_existing`, nothing is written if any of the store,
    /// public key or private key already exists; the error lists exactly the
    /// files that are in the way so a caller can confirm and retry.
    ///
    /// # Errors
    ///
    /// Returns `Error::OverwriteRequired` on conflict and
    /// `ConfigError::NoPrivateKey` if no private key path is configured.
    pub fn initialize(&self, overwrite_existing: bool) -> Result<KeyPair> {
        let private_key_file = self.private_key_path()?.clone();
        let _lock = self.lock()?;

        if !overwrite_existing {
            let paths: Vec<PathBuf> = self
                .paths
                .managed_files()
                .into_iter()
                .filter(|p| fs::symlink_metadata(p).is_ok())
                .map(|p| p.to_path_buf())
                .collect();
            if !paths.is_empty() {
                return Err(Error::OverwriteRequired { paths });
            }
        }

        // An empty store is consistent with any key pair, so it goes first.
        let pair = KeyPair::generate();
        Store::new().save(&self.paths.secrets_file)?;
        keys::write_key_pair(&self.paths.public_key_file, &private_key_file, &pair)?;

        info!(
            secrets = %self.paths.secrets_file.display(),
            fingerprint = %keys::fingerprint(pair.public()),
            "initialized vault"
        );
        Ok(pair)
    }

    /// Whether all three vault files exist.
    pub fn is_initialized(&self) -> bool {
        self.paths.private_key_file.is_some()
            && self.paths.managed_files().iter().all(|p| p.exists())
    }
}
