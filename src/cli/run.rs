//! Run command.
//!
//! Executes a command with `secret:NAME` environment values replaced by the
//! secrets they name.

use std::env;
use std::process::Command;

use tracing::debug;

use crate::core::resolve::{self, EnvPassthrough, SecretResolver};
use crate::core::vault::Vault;
use crate::error::Result;

/// Run a command with resolved environment values and exit with its code.
pub fn execute(vault: &Vault, passthrough: bool, command: &[String]) -> Result<()> {
    let resolver: &dyn SecretResolver = if passthrough {
        &EnvPassthrough
    } else {
        vault
    };

    let exit_code = run_resolved(resolver, command)?;
    std::process::exit(exit_code);
}

fn run_resolved(resolver: &dyn SecretResolver, command: &[String]) -> Result<i32> {
    let (program, args) = match command.split_first() {
        Some(split) => split,
        None => return Ok(0),
    };

    let resolved = resolve::resolve_env(resolver, utf8_vars())?;
    debug!(count = resolved.len(), program = %program, "resolved secret references");

    let mut cmd = Command::new(program);
    cmd.args(args);
    for (key, value) in &resolved {
        cmd.env(key, value.as_str());
    }

    let status = cmd.status()?;
    Ok(status.code().unwrap_or(1))
}

/// Environment entries that are valid UTF-8.
///
/// Anything else cannot hold a `secret:` reference and reaches the child
/// unchanged through the inherited environment.
fn utf8_vars() -> impl Iterator<Item = (String, String)> {
    env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}
