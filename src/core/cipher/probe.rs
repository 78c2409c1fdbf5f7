//! One-time capability probe for the envelope primitives.
//!
//! Runs a sealed-box and AES-256-GCM self test the first time any cipher
//! operation is requested. If it fails, every later call fails with
//! `ConfigError::CipherUnavailable`; no entry is ever produced without a
//! working AEAD.

use std::sync::OnceLock;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use crypto_box::SecretKey;
use tracing::{debug, error};

use crate::core::constants::{CEK_LEN, ENVELOPE_HEADER};
use crate::error::{ConfigError, Result};

static PROBE: OnceLock<std::result::Result<(), String>> = OnceLock::new();

const PROBE_PLAINTEXT: &[u8] = b"cellar capability probe";

/// Fail fast unless the envelope primitives work in this process.
///
/// # Errors
///
/// Returns `ConfigError::CipherUnavailable` with the probe failure reason.
pub fn ensure_available() -> Result<()> {
    PROBE
        .get_or_init(|| {
            let outcome = run_probe();
            match &outcome {
                Ok(()) => debug!("cipher capability probe passed"),
                Err(reason) => error!(reason = %reason, "cipher capability probe failed"),
            }
            outcome
        })
        .clone()
        .map_err(|reason| ConfigError::CipherUnavailable(reason).into())
}

fn run_probe() -> std::result::Result<(), String> {
    let mut key = [0u8; CEK_LEN];
    OsRng.fill_bytes(&mut key);

    let secret = SecretKey::generate(&mut OsRng);
    let sealed = secret
        .public_key()
        .seal(&mut OsRng, &key)
        .map_err(|e| format!("sealed box unavailable: {}", e))?;
    let opened = secret
        .unseal(&sealed)
        .map_err(|e| format!("sealed box open failed: {}", e))?;
    if opened != key {
        return Err("sealed box round trip mismatch".to_string());
    }

    let cipher =
        Aes256Gcm::new_from_slice(&key).map_err(|e| format!("AES-256-GCM unavailable: {}", e))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let aad = ENVELOPE_HEADER.as_bytes();

    let mut buffer = PROBE_PLAINTEXT.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(&nonce, aad, &mut buffer)
        .map_err(|e| format!("AES-256-GCM encrypt failed: {}", e))?;
    if buffer.len() != PROBE_PLAINTEXT.len() || buffer == PROBE_PLAINTEXT {
        return Err("AES-256-GCM produced no ciphertext".to_string());
    }

    cipher
        .decrypt_in_place_detached(&nonce, aad, &mut buffer, &tag)
        .map_err(|e| format!("AES-256-GCM decrypt failed: {}", e))?;
    if buffer != PROBE_PLAINTEXT {
        return Err("AES-256-GCM round trip mismatch".to_string());
    }

    Ok(())
}
