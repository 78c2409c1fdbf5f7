//! Envelope cipher: sealed-box wrapped content key plus AES-256-GCM.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, Nonce, OsRng, Tag};
use aes_gcm::Aes256Gcm;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use crypto_box::PublicKey;
use tracing::trace;
use zeroize::{Zeroize, Zeroizing};

use super::{probe, Cipher};
use crate::core::constants::{CEK_LEN, ENTRY_FIELDS, ENVELOPE_HEADER, NONCE_LEN, TAG_LEN};
use crate::core::keys::KeyPair;
use crate::error::{CipherError, FormatError, Result};

/// Decoded fields of a serialized entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub header: Vec<u8>,
    pub encrypted_key: Vec<u8>,
    pub nonce: Vec<u8>,
    pub ciphertext: Vec<u8>,
    pub tag: Vec<u8>,
}

impl Entry {
    /// Split and decode a compact entry.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::MalformedEntry` unless the entry has exactly
    /// five valid base64url fields with correctly sized nonce and tag.
    pub fn parse(compact: &str) -> Result<Self> {
        let fields: Vec<&str> = compact.split('.').collect();
        if fields.len() != ENTRY_FIELDS {
            return Err(FormatError::MalformedEntry(format!(
                "expected {} fields, found {}",
                ENTRY_FIELDS,
                fields.len()
            ))
            .into());
        }

        let decode = |name: &str, field: &str| {
            URL_SAFE_NO_PAD.decode(field).map_err(|e| {
                FormatError::MalformedEntry(format!("{} is not valid base64url: {}", name, e))
            })
        };

        let entry = Self {
            header: decode("header", fields[0])?,
            encrypted_key: decode("encrypted key", fields[1])?,
            nonce: decode("nonce", fields[2])?,
            ciphertext: decode("ciphertext", fields[3])?,
            tag: decode("tag", fields[4])?,
        };

        if entry.nonce.len() != NONCE_LEN {
            return Err(FormatError::MalformedEntry(format!(
                "nonce must be {} bytes, found {}",
                NONCE_LEN,
                entry.nonce.len()
            ))
            .into());
        }
        if entry.tag.len() != TAG_LEN {
            return Err(FormatError::MalformedEntry(format!(
                "tag must be {} bytes, found {}",
                TAG_LEN,
                entry.tag.len()
            ))
            .into());
        }

        Ok(entry)
    }

    /// Encode as five base64url fields joined by `.`.
    pub fn compact(&self) -> String {
        [
            &self.header,
            &self.encrypted_key,
            &self.nonce,
            &self.ciphertext,
            &self.tag,
        ]
        .iter()
        .map(|field| URL_SAFE_NO_PAD.encode(field))
        .collect::<Vec<_>>()
        .join(".")
    }
}

/// Sealed-box + AES-256-GCM envelope backend.
pub struct Envelope;

impl Cipher for Envelope {
    type Recipient = PublicKey;
    type Identity = KeyPair;

    fn name(&self) -> &'static str {
        "x25519-sealedbox+a256gcm"
    }

    fn encrypt(&self, plaintext: &str, recipient: &PublicKey) -> Result<String> {
        probe::ensure_available()?;
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let mut cek = Zeroizing::new([0u8; CEK_LEN]);
        OsRng.fill_bytes(&mut cek[..]);

        let encrypted_key = recipient.seal(&mut OsRng, &cek[..]).map_err(|e| {
            CipherError::EncryptionFailed(format!("failed to seal content key: {}", e))
        })?;

        let cipher = Aes256Gcm::new_from_slice(&cek[..])
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let header = ENVELOPE_HEADER.as_bytes();

        let mut buffer = plaintext.as_bytes().to_vec();
        let tag = cipher
            .encrypt_in_place_detached(&nonce, header, &mut buffer)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let entry = Entry {
            header: header.to_vec(),
            encrypted_key,
            nonce: nonce.to_vec(),
            ciphertext: buffer,
            tag: tag.to_vec(),
        };

        trace!(ciphertext_len = entry.ciphertext.len(), "encrypted");
        Ok(entry.compact())
    }

    fn decrypt(&self, encrypted: &str, pair: &KeyPair) -> Result<Zeroizing<String>> {
        probe::ensure_available()?;
        trace!(entry_len = encrypted.len(), "decrypting");

        let Entry {
            header,
            encrypted_key,
            nonce,
            ciphertext,
            tag,
        } = Entry::parse(encrypted)?;

        if header != ENVELOPE_HEADER.as_bytes() {
            return Err(
                FormatError::UnsupportedHeader(String::from_utf8_lossy(&header).into_owned())
                    .into(),
            );
        }

        // Opening derives the recipient public key from the secret half, so
        // the pair's public key is exactly what the sealed box was bound to.
        let cek = Zeroizing::new(
            pair.secret()
                .unseal(&encrypted_key)
                .map_err(|_| CipherError::DecryptionFailed)?,
        );
        if cek.len() != CEK_LEN {
            return Err(CipherError::DecryptionFailed.into());
        }

        let cipher =
            Aes256Gcm::new_from_slice(&cek[..]).map_err(|_| CipherError::DecryptionFailed)?;

        let mut buffer = Zeroizing::new(ciphertext);
        cipher
            .decrypt_in_place_detached(
                Nonce::<Aes256Gcm>::from_slice(&nonce),
                &header,
                &mut buffer[..],
                Tag::<Aes256Gcm>::from_slice(&tag),
            )
            .map_err(|_| CipherError::DecryptionFailed)?;

        let plaintext = String::from_utf8(std::mem::take(&mut *buffer)).map_err(|e| {
            e.into_bytes().zeroize();
            FormatError::InvalidUtf8
        })?;

        trace!(plaintext_len = plaintext.len(), "decrypted");
        Ok(Zeroizing::new(plaintext))
    }
}
