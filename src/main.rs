//! Cellar - file-backed secrets vault with public-key envelope encryption.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cellar::cli::output;
use cellar::cli::{execute, Cli};
use cellar::error::{CipherError, ConfigError, Error, RotationError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("CELLAR_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("cellar=debug")
        } else {
            EnvFilter::new("cellar=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command, &cli.paths) {
        output::error(&e.to_string());
        if let Some(hint) = hint_for(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

/// Suggested next step for errors a user can fix.
fn hint_for(e: &Error) -> Option<&'static str> {
    match e {
        Error::Config(ConfigError::MissingStore(_)) => Some("run: cellar init"),
        Error::Config(ConfigError::NoPrivateKey) => {
            Some("pass --private-key or set CELLAR_PRIVATE_KEY")
        }
        Error::Config(ConfigError::KeyMismatch { .. }) => {
            Some("both key files must come from the same `cellar init` or `cellar rotate`")
        }
        Error::OverwriteRequired { .. } => Some("run: cellar init --force"),
        Error::Locked(_) => Some("another cellar command is using the vault, retry when it finishes"),
        Error::Cipher(CipherError::DecryptionFailed) => {
            Some("the entry was encrypted for a different key pair or has been modified")
        }
        Error::Rotation(RotationError::RollbackFailed { .. }) => {
            Some("restore the key files and secrets store from backup before running cellar again")
        }
        _ => None,
    }
}
