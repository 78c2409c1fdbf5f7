//! Add command.
//!
//! Takes the value from the command line, a pipe, or a hidden prompt.

use std::io::{self, IsTerminal, Read};

use dialoguer::Password;
use tracing::debug;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::core::validation::validate_name;
use crate::core::vault::Vault;
use crate::error::Result;

/// Encrypt and store one secret.
pub fn execute(vault: &Vault, name: &str, value: Option<String>) -> Result<()> {
    // Fail on a bad name before prompting for the value.
    validate_name(name)?;

    let value = match value {
        Some(v) => Zeroizing::new(v),
        None if !io::stdin().is_terminal() => {
            debug!("reading secret value from stdin");
            let mut input = Zeroizing::new(String::new());
            io::stdin().read_to_string(&mut input)?;
            strip_newline(&mut input);
            input
        }
        None => Zeroizing::new(
            Password::new()
                .with_prompt(format!("Value for {}", output::key(name)))
                .allow_empty_password(true)
                .interact()?,
        ),
    };

    vault.add_entry(name, &value)?;
    output::success(&format!("added {}", output::key(name)));
    Ok(())
}

/// Drop one trailing line ending, as left by `echo` or a heredoc.
fn strip_newline(value: &mut String) {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
}
