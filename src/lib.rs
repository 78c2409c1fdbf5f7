//! Cellar - a file-backed secrets vault with public-key envelope encryption.
//!
//! Each secret is encrypted with its own AES-256-GCM key, and that key is
//! sealed to the vault's X25519 public key. Anyone with the public key can
//! add secrets; reading them needs the private key as well.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! └── core/             # Core library components
//!     ├── cipher/       # Envelope encryption and capability probe
//!     ├── config        # .cellar.toml and path resolution
//!     ├── editor        # External editor invocation
//!     ├── keys          # Key pair generation and key files
//!     ├── lock          # Advisory lock for mutations
//!     ├── resolve       # secret:NAME references
//!     ├── store         # JSON store file and atomic writes
//!     └── vault/        # Vault operations (edit, import, rotation)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cellar::core::config::Overrides;
//! use cellar::Vault;
//!
//! # fn main() -> cellar::error::Result<()> {
//! let vault = Vault::open(&Overrides::default())?;
//! vault.add_entry("DATABASE_URL", "postgres://localhost/app")?;
//! let url = vault.get_secret("DATABASE_URL")?;
//! assert_eq!(url.as_str(), "postgres://localhost/app");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::keys::KeyPair;
pub use crate::core::vault::{EditSummary, ImportSummary, Phase, RotationReport, Vault};
pub use crate::error::{Error, Result};
