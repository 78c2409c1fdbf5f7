//! External editor invocation.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use crate::core::constants::DEFAULT_EDITOR;
use crate::error::{EditorError, Result};

/// Something that lets a user modify a file in place.
pub trait Editor {
    /// Block until the user is done editing `path`.
    fn edit(&self, path: &Path) -> Result<()>;
}

/// The user's editor, run as a child process.
#[derive(Debug, Clone)]
pub struct SystemEditor {
    command: String,
    program: PathBuf,
    args: Vec<String>,
}

impl SystemEditor {
    /// Pick the editor from `explicit`, then `$VISUAL`, then `$EDITOR`,
    /// falling back to `vi`. Empty values are skipped.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::NotFound` if the program is not on `PATH`.
    pub fn from_env(explicit: Option<String>) -> Result<Self> {
        let command = explicit
            .filter(|s| !s.trim().is_empty())
            .or_else(|| env_command("VISUAL"))
            .or_else(|| env_command("EDITOR"))
            .unwrap_or_else(|| DEFAULT_EDITOR.to_string());

        Self::from_command(&command)
    }

    /// Parse a command line such as `code --wait`.
    pub fn from_command(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace();
        let name = parts
            .next()
            .ok_or_else(|| EditorError::NotFound(command.to_string()))?;
        let program = which::which(name).map_err(|_| EditorError::NotFound(name.to_string()))?;

        debug!(editor = command, program = %program.display(), "resolved editor");
        Ok(Self {
            command: command.to_string(),
            program,
            args: parts.map(str::to_string).collect(),
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl Editor for SystemEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .status()
            .map_err(|source| EditorError::Launch {
                editor: self.command.clone(),
                source,
            })?;

        // Many editors exit non-zero for reasons unrelated to the file.
        if status.success() {
            debug!(editor = %self.command, "editor exited");
        } else {
            warn!(editor = %self.command, %status, "editor exited with failure status");
        }
        Ok(())
    }
}

fn env_command(var: &str) -> Option<String> {
    env::var(var).ok().filter(|s| !s.trim().is_empty())
}
