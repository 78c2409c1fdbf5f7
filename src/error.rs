//! Error types for cellar.
//!
//! One top-level [`Error`] wraps a small enum per concern. Callers that need
//! to react to a specific failure (an interactive `init` retrying after an
//! overwrite prompt, a resolver distinguishing a missing secret) match on the
//! variant; everyone else just propagates with `?`.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::vault::Phase;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rotation(#[from] RotationError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    /// `initialize` declined to clobber existing vault files.
    #[error("refusing to overwrite existing files: {}", join_paths(.paths))]
    OverwriteRequired { paths: Vec<PathBuf> },

    #[error("vault is locked by another process: {}", .0.display())]
    Locked(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl Error {
    /// Paths that blocked `initialize`, if this is an overwrite refusal.
    pub fn conflicting_paths(&self) -> Option<&[PathBuf]> {
        match self {
            Self::OverwriteRequired { paths } => Some(paths),
            _ => None,
        }
    }

    /// True for authentication failures while opening an entry.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::Cipher(CipherError::DecryptionFailed))
    }
}

/// Missing or unusable paths, keys and settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("secrets file not found: {}", .0.display())]
    MissingStore(PathBuf),

    #[error("invalid key file {}: {reason}", .path.display())]
    InvalidKey { path: PathBuf, reason: String },

    #[error("private key {} does not belong to public key {}", .private.display(), .public.display())]
    KeyMismatch { public: PathBuf, private: PathBuf },

    #[error("no private key configured: reading secrets requires the private key file")]
    NoPrivateKey,

    #[error("cipher unavailable: {0}")]
    CipherUnavailable(String),

    #[error("failed to read config {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Store or entry contents that do not have the expected shape.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("{} does not contain a valid JSON object of secrets: {source}", .path.display())]
    InvalidStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed entry: {0}")]
    MalformedEntry(String),

    #[error("unsupported envelope header: {0}")]
    UnsupportedHeader(String),

    #[error("decrypted secret is not valid UTF-8")]
    InvalidUtf8,

    #[error("failed to serialize secrets: {0}")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SecretError {
    #[error("secret not found: {name}{}", suggestion_suffix(.suggestion))]
    NotFound {
        name: String,
        suggestion: Option<String>,
    },

    #[error("environment variable {0} is not set")]
    EnvNotSet(String),
}

impl SecretError {
    /// Build a not-found error, suggesting the closest existing name.
    pub fn not_found_with_suggestions(name: String, available: &[String]) -> Self {
        let suggestion = closest_name(&name, available);
        Self::NotFound { name, suggestion }
    }
}

/// Envelope encryption failures.
///
/// `DecryptionFailed` carries no detail: a wrong key pair and a tampered
/// entry are indistinguishable to the caller.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("unable to decrypt secret: verify the configured key pair")]
    DecryptionFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("secret name cannot be empty")]
    EmptyName,

    #[error("invalid secret name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("{0} is not a valid secrets document: {1}")]
    InvalidDocument(String, String),

    #[error("unsupported reference '{0}': expected secret:NAME")]
    UnsupportedReference(String),
}

/// Key rotation failures. Rollback has always been attempted by the time one
/// of these is returned.
#[derive(Error, Debug)]
pub enum RotationError {
    #[error("key rotation failed during {phase}, vault left unchanged: {source}")]
    Failed {
        phase: Phase,
        #[source]
        source: Box<Error>,
    },

    #[error(
        "key rotation failed during {phase} ({source}) and rollback also failed ({rollback}); \
         key files and secrets store may no longer match, restore them from backup now"
    )]
    RollbackFailed {
        phase: Phase,
        #[source]
        source: Box<Error>,
        rollback: Box<Error>,
    },
}

impl RotationError {
    /// Phase that failed.
    pub fn phase(&self) -> Phase {
        match self {
            Self::Failed { phase, .. } | Self::RollbackFailed { phase, .. } => *phase,
        }
    }
}

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("editor not found: {0}")]
    NotFound(String),

    #[error("failed to launch editor {editor}: {source}")]
    Launch {
        editor: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean {}?)", s),
        None => String::new(),
    }
}

/// Pick an existing name that differs only by case or is a prefix match.
fn closest_name(name: &str, available: &[String]) -> Option<String> {
    let lower = name.to_ascii_lowercase();
    available
        .iter()
        .find(|candidate| candidate.to_ascii_lowercase() == lower)
        .or_else(|| {
            available.iter().find(|candidate| {
                let c = candidate.to_ascii_lowercase();
                !lower.is_empty() && (c.starts_with(&lower) || lower.starts_with(&c))
            })
        })
        .cloned()
}

impl From<tempfile::PersistError> for Error {
    fn from(e: tempfile::PersistError) -> Self {
        Self::Io(e.error)
    }
}
