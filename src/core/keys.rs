//! Key pair generation and storage.
//!
//! The vault key pair is an X25519 key pair kept as two independent raw
//! files of exactly [`KEY_LEN`] bytes. Producers that only add secrets need
//! the public key; reading requires both halves.

use std::fmt;
use std::fs;
use std::path::Path;

use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, SecretKey};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::constants::KEY_LEN;
use crate::core::store::write_atomic;
use crate::error::{ConfigError, Result};

/// Public/private key pair used to seal and open content keys.
///
/// The secret half zeroizes itself on drop.
#[derive(Clone)]
pub struct KeyPair {
    public: PublicKey,
    secret: SecretKey,
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &fingerprint(&self.public))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl KeyPair {
    /// Generate a fresh key pair in memory.
    pub fn generate() -> Self {
        let secret = SecretKey::generate(&mut OsRng);
        let public = secret.public_key();
        Self { public, secret }
    }

    /// Assemble a pair from its halves, checking that they belong together.
    ///
    /// Returns `None` when the secret key does not derive `public`.
    pub fn from_parts(public: PublicKey, secret: SecretKey) -> Option<Self> {
        if secret.public_key().as_bytes() != public.as_bytes() {
            return None;
        }
        Some(Self { public, secret })
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    pub(crate) fn secret(&self) -> &SecretKey {
        &self.secret
    }

    /// Raw public key bytes.
    pub fn public_bytes(&self) -> [u8; KEY_LEN] {
        *self.public.as_bytes()
    }

    /// Raw private key bytes, wiped when dropped.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; KEY_LEN]> {
        Zeroizing::new(self.secret.to_bytes())
    }
}

/// Load a public key file.
///
/// # Errors
///
/// Returns `ConfigError::InvalidKey` unless `path` is a readable regular
/// file of exactly [`KEY_LEN`] bytes.
pub fn load_public_key(path: &Path) -> Result<PublicKey> {
    let bytes = read_key_file(path)?;
    Ok(PublicKey::from(*bytes))
}

/// Load a private key file.
///
/// # Errors
///
/// Same conditions as [`load_public_key`].
pub fn load_private_key(path: &Path) -> Result<SecretKey> {
    let bytes = read_key_file(path)?;

    #[cfg(unix)]
    {
        if let Ok(Some(mode)) = crate::core::validation::excess_permissions(path, 0o600) {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "private key file is readable by other users, run: chmod 600"
            );
        }
    }

    Ok(SecretKey::from(*bytes))
}

/// Load both key files and check that they form a pair.
///
/// # Errors
///
/// Returns `ConfigError::InvalidKey` for an unusable file and
/// `ConfigError::KeyMismatch` when the private key does not derive the
/// public key.
pub fn load_key_pair(public_path: &Path, private_path: &Path) -> Result<KeyPair> {
    let public = load_public_key(public_path)?;
    let secret = load_private_key(private_path)?;

    KeyPair::from_parts(public, secret).ok_or_else(|| {
        ConfigError::KeyMismatch {
            public: public_path.to_path_buf(),
            private: private_path.to_path_buf(),
        }
        .into()
    })
}

/// Write both halves of a key pair.
///
/// Each file is replaced atomically. The private key is written with mode
/// `0600` on Unix. Whether existing files may be replaced is the caller's
/// decision.
pub fn write_key_pair(public_path: &Path, private_path: &Path, pair: &KeyPair) -> Result<()> {
    debug!(
        public = %public_path.display(),
        private = %private_path.display(),
        fingerprint = %fingerprint(pair.public()),
        "writing key pair"
    );

    write_atomic(public_path, &pair.public_bytes(), 0o644)?;
    write_atomic(private_path, &pair.secret_bytes()[..], 0o600)?;

    Ok(())
}

/// Short SHA-256 fingerprint of a public key, for display.
pub fn fingerprint(public: &PublicKey) -> String {
    let digest = Sha256::digest(public.as_bytes());
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

fn read_key_file(path: &Path) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let invalid = |reason: String| ConfigError::InvalidKey {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
    if !metadata.is_file() {
        return Err(invalid("not a regular file".to_string()).into());
    }
    if metadata.len() != KEY_LEN as u64 {
        return Err(invalid(format!(
            "expected {} bytes, found {}",
            KEY_LEN,
            metadata.len()
        ))
        .into());
    }

    let contents = Zeroizing::new(fs::read(path).map_err(|e| invalid(e.to_string()))?);
    let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
    if contents.len() != KEY_LEN {
        return Err(invalid(format!(
            "expected {} bytes, found {}",
            KEY_LEN,
            contents.len()
        ))
        .into());
    }
    bytes.copy_from_slice(&contents);

    debug!(path = %path.display(), "loaded key file");
    Ok(bytes)
}
