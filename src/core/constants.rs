//! Constants used throughout cellar.
//!
//! Centralizes file names, sizes and the envelope header.

/// Configuration file name (.cellar.toml).
pub const CONFIG_FILE: &str = ".cellar.toml";

/// Default secrets store path, relative to the working directory.
pub const DEFAULT_SECRETS_FILE: &str = ".cellar/secrets.json";

/// Default public key path.
pub const DEFAULT_PUBLIC_KEY_FILE: &str = ".cellar/public.key";

/// Default private key path.
pub const DEFAULT_PRIVATE_KEY_FILE: &str = ".cellar/private.key";

/// Suffix appended to the store path for the advisory lock file.
pub const LOCK_SUFFIX: &str = ".lock";

/// Seconds to wait for another process to release the vault lock.
pub const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 10;

/// Raw length of both halves of the key pair.
pub const KEY_LEN: usize = 32;

/// AES-256-GCM content encryption key length.
pub const CEK_LEN: usize = 32;

/// AES-GCM nonce length.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length.
pub const TAG_LEN: usize = 16;

/// Number of dot-separated fields in a serialized entry.
pub const ENTRY_FIELDS: usize = 5;

/// Envelope header, also used verbatim as AEAD associated data.
pub const ENVELOPE_HEADER: &str =
    r#"{"alg":"X25519-XSalsa20Poly1305-SealedBox","enc":"A256GCM","v":1}"#;

/// Prefix for configuration values that reference a stored secret.
pub const SECRET_PREFIX: &str = "secret";

/// Editor used when neither `--editor`, `$VISUAL` nor `$EDITOR` is set.
pub const DEFAULT_EDITOR: &str = "vi";
