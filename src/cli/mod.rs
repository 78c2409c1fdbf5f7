//! Command-line interface.

pub mod add;
pub mod completions;
pub mod edit;
pub mod import;
pub mod init;
pub mod output;
pub mod rotate;
pub mod run;
pub mod secrets;
pub mod status;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::Overrides;
use crate::core::vault::Vault;
use crate::error::Result;

/// Cellar - encrypted secrets vault for your project.
#[derive(Parser)]
#[command(
    name = "cellar",
    about = "File-backed secrets vault with public-key envelope encryption",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging (CELLAR_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub paths: PathArgs,
}

/// Vault file locations. Each one overrides `.cellar.toml`.
#[derive(Args, Debug, Default, Clone)]
pub struct PathArgs {
    /// Config file (default: .cellar.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Secrets store file
    #[arg(long, global = true, env = "CELLAR_SECRETS_FILE", value_name = "PATH")]
    pub secrets_file: Option<PathBuf>,

    /// Public key file
    #[arg(long, global = true, env = "CELLAR_PUBLIC_KEY", value_name = "PATH")]
    pub public_key: Option<PathBuf>,

    /// Private key file
    #[arg(long, global = true, env = "CELLAR_PRIVATE_KEY", value_name = "PATH")]
    pub private_key: Option<PathBuf>,
}

impl PathArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            secrets_file: self.secrets_file.clone(),
            public_key_file: self.public_key.clone(),
            private_key_file: self.private_key.clone(),
        }
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Create the secrets store and a new key pair
    Init {
        /// Replace existing vault files without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Encrypt and store a secret (reads stdin or prompts without VALUE)
    Add {
        /// Secret name (e.g., DATABASE_URL or app:token)
        name: String,
        /// Secret value
        value: Option<String>,
    },

    /// Print a decrypted secret
    Get {
        /// Secret name
        name: String,
    },

    /// Remove a secret
    Rm {
        /// Secret name
        name: String,
    },

    /// List secret names
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print all decrypted secrets as JSON
    Export,

    /// Encrypt every entry of a plaintext JSON file into the store
    Import {
        /// JSON object of secret names to values
        file: PathBuf,
        /// Make the store hold exactly the imported secrets
        #[arg(long)]
        replace: bool,
    },

    /// Edit all secrets in your editor
    Edit {
        /// Editor command (default: $VISUAL, $EDITOR, then vi)
        #[arg(long)]
        editor: Option<String>,
    },

    /// Generate a new key pair and re-encrypt every secret
    Rotate {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show vault files and key status
    Status,

    /// Run a command with secret:NAME environment values resolved
    Run {
        /// Read NAME from the environment instead of the vault
        #[arg(long)]
        passthrough: bool,
        /// Command and arguments to run
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a parsed command.
pub fn execute(command: Command, paths: &PathArgs) -> Result<()> {
    match command {
        Command::Completions { shell } => completions::execute(shell),
        command => execute_in_vault(command, &Vault::open(&paths.overrides())?),
    }
}

fn execute_in_vault(command: Command, vault: &Vault) -> Result<()> {
    match command {
        Command::Init { force } => init::execute(vault, force),
        Command::Add { name, value } => add::execute(vault, &name, value),
        Command::Get { name } => secrets::get(vault, &name),
        Command::Rm { name } => secrets::rm(vault, &name),
        Command::List { json } => secrets::list(vault, json),
        Command::Export => secrets::export(vault),
        Command::Import { file, replace } => import::execute(vault, &file, replace),
        Command::Edit { editor } => edit::execute(vault, editor),
        Command::Rotate { yes } => rotate::execute(vault, yes),
        Command::Status => status::execute(vault),
        Command::Run {
            passthrough,
            command,
        } => run::execute(vault, passthrough, &command),
        Command::Completions { shell } => completions::execute(shell),
    }
}
