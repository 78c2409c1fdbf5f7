//! Exclusive advisory lock for vault mutations.
//!
//! Every operation that rewrites the store or key files holds a lock on
//! `<store path>.lock` for its whole duration. Acquisition polls until a
//! timeout instead of blocking forever.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;
use tracing::{debug, trace};

use crate::core::constants::LOCK_SUFFIX;
use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Held lock; released on drop.
#[derive(Debug)]
pub struct VaultLock {
    file: File,
    path: PathBuf,
}

impl VaultLock {
    /// Acquire the lock guarding `store_path`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Locked` if another holder keeps the lock past
    /// `timeout`, or an I/O error if the lock file cannot be opened.
    pub fn acquire(store_path: &Path, timeout: Duration) -> Result<Self> {
        let path = lock_path(store_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let started = Instant::now();
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => {
                    debug!(path = %path.display(), "acquired vault lock");
                    return Ok(Self { file, path });
                }
                Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                    if started.elapsed() >= timeout {
                        return Err(Error::Locked(path));
                    }
                    trace!(path = %path.display(), "vault lock busy, waiting");
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for VaultLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!(path = %self.path.display(), "released vault lock");
    }
}

/// Lock file path for a store path.
pub fn lock_path(store_path: &Path) -> PathBuf {
    let mut name = OsString::from(store_path.as_os_str());
    name.push(LOCK_SUFFIX);
    PathBuf::from(name)
}
