//! Key pair rotation.
//!
//! Rotation runs in four phases under the vault lock:
//!
//! 1. **snapshot**: record the raw bytes of all three vault files and decrypt
//!    every entry into memory.
//! 2. **keygen**: generate the new key pair in memory.
//! 3. **reencrypt**: encrypt every plaintext to the new public key.
//! 4. **commit**: write the new key files, then swap in the new store.
//!
//! Nothing on disk changes before commit. If commit fails part way, the
//! recorded bytes are written back so the vault ends up exactly as it was.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use super::Vault;
use crate::core::cipher;
use crate::core::keys::{self, KeyPair};
use crate::core::lock::VaultLock;
use crate::core::store::{write_atomic, Store};
use crate::core::types::SecretName;
use crate::error::{Error, Result, RotationError};

/// Rotation phase, reported in errors and passed to checkpoint hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Snapshot,
    Keygen,
    Reencrypt,
    Commit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Snapshot => "snapshot",
            Self::Keygen => "keygen",
            Self::Reencrypt => "reencrypt",
            Self::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful rotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationReport {
    /// Number of secrets re-encrypted.
    pub secrets: usize,
    pub old_fingerprint: String,
    pub new_fingerprint: String,
}

/// Original vault state, captured before anything is modified.
///
/// Owns the vault lock, so the lock is held for as long as the snapshot
/// lives.
struct Snapshot {
    _lock: VaultLock,
    private_key_file: PathBuf,
    store: Vec<u8>,
    public_key: Vec<u8>,
    private_key: Zeroizing<Vec<u8>>,
    plaintexts: BTreeMap<SecretName, Zeroizing<String>>,
    fingerprint: String,
}

impl Vault {
    /// Replace the key pair and re-encrypt every secret under it.
    ///
    /// # Errors
    ///
    /// Returns `RotationError::Failed` with the vault unchanged, or
    /// `RotationError::RollbackFailed` if the original files could not be
    /// put back.
    pub fn rotate_key_pair(&self) -> Result<RotationReport> {
        self.rotate_key_pair_with(|_| Ok(()))
    }

    /// Rotate, calling `checkpoint` at the end of every phase.
    ///
    /// During commit the hook runs once the new key files are written and
    /// before the store is swapped. An error from the hook fails the phase it
    /// was called for, exactly like an internal failure would.
    pub fn rotate_key_pair_with<F>(&self, mut checkpoint: F) -> Result<RotationReport>
    where
        F: FnMut(Phase) -> Result<()>,
    {
        let snapshot = self
            .take_snapshot()
            .and_then(|snapshot| {
                checkpoint(Phase::Snapshot)?;
                Ok(snapshot)
            })
            .map_err(|source| failed(Phase::Snapshot, source))?;

        debug!(
            secrets = snapshot.plaintexts.len(),
            fingerprint = %snapshot.fingerprint,
            "rotation snapshot taken"
        );

        let mut phase = Phase::Keygen;
        let mut files_touched = false;
        let result = self.rotate_phases(&snapshot, &mut checkpoint, &mut phase, &mut files_touched);

        let new_pair = match result {
            Ok(pair) => pair,
            Err(source) => return Err(self.roll_back(&snapshot, phase, files_touched, source)),
        };

        let report = RotationReport {
            secrets: snapshot.plaintexts.len(),
            old_fingerprint: snapshot.fingerprint.clone(),
            new_fingerprint: keys::fingerprint(new_pair.public()),
        };
        info!(
            secrets = report.secrets,
            old = %report.old_fingerprint,
            new = %report.new_fingerprint,
            "rotated key pair"
        );
        Ok(report)
    }

    /// Phase 1.
    fn take_snapshot(&self) -> Result<Snapshot> {
        let private_key_file = self.private_key_path()?.clone();
        let lock = self.lock()?;

        let ctx = self.validate(true)?;
        let pair = ctx.key_pair()?;

        let store = fs::read(&self.paths.secrets_file)?;
        let public_key = fs::read(&self.paths.public_key_file)?;
        let private_key = Zeroizing::new(fs::read(&private_key_file)?);

        let mut plaintexts = BTreeMap::new();
        for (name, encrypted) in ctx.store.iter() {
            plaintexts.insert(name.clone(), cipher::decrypt(encrypted, pair)?);
        }

        Ok(Snapshot {
            _lock: lock,
            private_key_file,
            store,
            public_key,
            private_key,
            plaintexts,
            fingerprint: keys::fingerprint(pair.public()),
        })
    }

    /// Phases 2 to 4. `phase` tracks where a failure happened and
    /// `files_touched` whether commit has started writing.
    fn rotate_phases<F>(
        &self,
        snapshot: &Snapshot,
        checkpoint: &mut F,
        phase: &mut Phase,
        files_touched: &mut bool,
    ) -> Result<KeyPair>
    where
        F: FnMut(Phase) -> Result<()>,
    {
        *phase = Phase::Keygen;
        let new_pair = KeyPair::generate();
        checkpoint(Phase::Keygen)?;

        *phase = Phase::Reencrypt;
        let mut store = Store::new();
        for (name, plaintext) in &snapshot.plaintexts {
            store.insert(name.clone(), cipher::encrypt(plaintext, new_pair.public())?);
        }
        checkpoint(Phase::Reencrypt)?;

        *phase = Phase::Commit;
        *files_touched = true;
        keys::write_key_pair(
            &self.paths.public_key_file,
            &snapshot.private_key_file,
            &new_pair,
        )?;
        checkpoint(Phase::Commit)?;
        store.save(&self.paths.secrets_file)?;

        Ok(new_pair)
    }

    fn roll_back(
        &self,
        snapshot: &Snapshot,
        phase: Phase,
        files_touched: bool,
        source: Error,
    ) -> Error {
        if !files_touched {
            warn!(%phase, error = %source, "rotation aborted before commit, nothing to restore");
            return failed(phase, source);
        }

        warn!(%phase, error = %source, "rotation failed, restoring original vault files");
        match self.restore(snapshot) {
            Ok(()) => failed(phase, source),
            Err(rollback) => {
                error!(
                    %phase,
                    error = %source,
                    rollback_error = %rollback,
                    "rollback failed, key files and secrets store may not match"
                );
                RotationError::RollbackFailed {
                    phase,
                    source: Box::new(source),
                    rollback: Box::new(rollback),
                }
                .into()
            }
        }
    }

    /// Write the snapshot bytes back. Every file is attempted even if an
    /// earlier one fails; the first error is returned.
    fn restore(&self, snapshot: &Snapshot) -> Result<()> {
        let files: [(&Path, &[u8], u32); 3] = [
            (
                self.paths.public_key_file.as_path(),
                snapshot.public_key.as_slice(),
                0o644,
            ),
            (
                snapshot.private_key_file.as_path(),
                snapshot.private_key.as_slice(),
                0o600,
            ),
            (
                self.paths.secrets_file.as_path(),
                snapshot.store.as_slice(),
                0o644,
            ),
        ];

        let mut first_error = None;
        for (path, bytes, mode) in files {
            if let Err(e) = write_atomic(path, bytes, mode) {
                warn!(path = %path.display(), error = %e, "failed to restore file");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

fn failed(phase: Phase, source: Error) -> Error {
    RotationError::Failed {
        phase,
        source: Box::new(source),
    }
    .into()
}
