//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A secret name (e.g., DATABASE_URL, db:primary:password).
///
/// Must match `(\w+:)*\w+`.
pub type SecretName = String;

/// A serialized envelope: five base64url fields joined by `.`.
pub type EncryptedValue = String;
