//! Cryptographic operations.
//!
//! Every secret is stored as an envelope: a random AES-256-GCM content key
//! encrypts the value, and the content key itself is sealed to the vault
//! public key with an anonymous X25519 sealed box. Producers only need the
//! public key; opening an entry needs the full key pair.
//!
//! ## Entry format
//!
//! Five base64url fields joined by `.`, in the manner of JWE compact
//! serialization:
//!
//! ```text
//! header.encrypted_key.nonce.ciphertext.tag
//! ```
//!
//! The header names the algorithms and doubles as AEAD associated data.

use zeroize::Zeroizing;

use crate::core::keys::KeyPair;
use crate::error::Result;

mod envelope;
mod probe;

pub use crypto_box::PublicKey;
pub use envelope::{Entry, Envelope};
pub use probe::ensure_available;

/// Cryptographic backend trait.
///
/// Abstracts the per-secret encryption scheme so the store and rotation
/// logic never touch algorithm details.
pub trait Cipher {
    /// Type a producer encrypts to.
    type Recipient;

    /// Type required to open an entry.
    type Identity;

    /// Encrypt plaintext for a recipient.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if encryption fails, or
    /// `ConfigError::CipherUnavailable` if the probe failed.
    fn encrypt(&self, plaintext: &str, recipient: &Self::Recipient) -> Result<String>;

    /// Decrypt a serialized entry.
    ///
    /// # Errors
    ///
    /// Returns `FormatError` for a malformed entry and
    /// `CipherError::DecryptionFailed` for any authentication failure.
    fn decrypt(&self, encrypted: &str, identity: &Self::Identity) -> Result<Zeroizing<String>>;

    /// Backend name for display.
    fn name(&self) -> &'static str;
}

/// Encrypt plaintext for the vault public key.
///
/// This is a convenience wrapper around `Envelope::encrypt`.
pub fn encrypt(plaintext: &str, recipient: &PublicKey) -> Result<String> {
    Envelope.encrypt(plaintext, recipient)
}

/// Decrypt an entry with the vault key pair.
///
/// This is a convenience wrapper around `Envelope::decrypt`.
pub fn decrypt(encrypted: &str, pair: &KeyPair) -> Result<Zeroizing<String>> {
    Envelope.decrypt(encrypted, pair)
}
