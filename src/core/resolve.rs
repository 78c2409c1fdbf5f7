//! `secret:NAME` references in configuration values.
//!
//! A value such as `secret:DATABASE_URL` stands for the decrypted secret
//! named `DATABASE_URL`. Environments without a vault use [`EnvPassthrough`],
//! which drops the prefix and reads the environment variable of that name
//! instead, so the same configuration works in both places.

use std::collections::BTreeMap;
use std::env;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::constants::SECRET_PREFIX;
use crate::core::vault::Vault;
use crate::error::{Result, SecretError, ValidationError};

/// Source of secret values by name.
pub trait SecretResolver {
    /// Plaintext of the secret `name`.
    fn decrypt(&self, name: &str) -> Result<Zeroizing<String>>;

    /// Resolve a `secret:NAME` reference.
    fn process(&self, value: &str) -> Result<Zeroizing<String>> {
        resolve_reference(self, value)
    }
}

impl SecretResolver for Vault {
    fn decrypt(&self, name: &str) -> Result<Zeroizing<String>> {
        self.get_secret(name)
    }
}

/// Resolver used when the vault is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvPassthrough;

impl SecretResolver for EnvPassthrough {
    fn decrypt(&self, name: &str) -> Result<Zeroizing<String>> {
        env::var(name)
            .map(Zeroizing::new)
            .map_err(|_| SecretError::EnvNotSet(name.to_string()).into())
    }
}

/// Split `secret:NAME` and hand `NAME` to the resolver.
///
/// The split happens at the first `:`, so namespaced names such as
/// `secret:app:token` keep their own separators.
///
/// # Errors
///
/// Returns `ValidationError::UnsupportedReference` for any other prefix or
/// a value without one.
pub fn resolve_reference<R>(resolver: &R, value: &str) -> Result<Zeroizing<String>>
where
    R: SecretResolver + ?Sized,
{
    match value.split_once(':') {
        Some((SECRET_PREFIX, name)) if !name.is_empty() => {
            debug!(name, "resolving secret reference");
            resolver.decrypt(name)
        }
        _ => Err(ValidationError::UnsupportedReference(value.to_string()).into()),
    }
}

/// True when `value` looks like a `secret:` reference.
pub fn is_reference(value: &str) -> bool {
    value
        .split_once(':')
        .is_some_and(|(prefix, _)| prefix == SECRET_PREFIX)
}

/// Resolve every reference among `vars`, leaving other values untouched.
///
/// Used to build the environment of a child process.
pub fn resolve_env<R, I>(resolver: &R, vars: I) -> Result<BTreeMap<String, Zeroizing<String>>>
where
    R: SecretResolver + ?Sized,
    I: IntoIterator<Item = (String, String)>,
{
    let mut resolved = BTreeMap::new();
    for (key, value) in vars {
        if is_reference(&value) {
            resolved.insert(key, resolver.process(&value)?);
        }
    }
    Ok(resolved)
}
