//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod block_parser;
pub mod clipboard;
pub mod commands;
pub mod input;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser};
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::crypto::{KeyVault, Session};
use crate::errors::{PassVaultError, Result};
use crate::generator::generate_password;
use crate::vault::AccountStore;

/// Minimum password length to prevent trivially weak master passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable checked before prompting for the master password.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: encrypted password store.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Encrypted password store with a backup trail",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store directory (default: .passvault)
    #[arg(long, env = "PASSVAULT_DIR", default_value = ".passvault", global = true)]
    pub store_dir: String,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new store and choose the master password
    Init,

    /// Change the master password
    Master {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List accounts matching a filter
    Ls {
        /// Substring to match (default: everything)
        filter: Option<String>,
        /// Include backups
        #[arg(short, long)]
        all: bool,
    },

    /// Add a new account
    Add {
        /// Account name, `/` separates folders (e.g. mail/work)
        account: String,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        clip: ClipArgs,
    },

    /// Replace the content of an account
    Edit {
        /// Substring selecting the account
        filter: Option<String>,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        clip: ClipArgs,
    },

    /// Copy an account's secret to the clipboard
    Copy {
        /// Substring selecting the account
        filter: Option<String>,
        #[command(flatten)]
        clip: ClipArgs,
    },

    /// Print every line of an account
    Print {
        /// Substring selecting the account
        filter: Option<String>,
    },

    /// Rename an account (backups move with it)
    Mv {
        /// Substring selecting the account
        filter: String,
        /// New account name
        to: String,
    },

    /// Delete an account (backups are kept)
    Rm {
        /// Substring selecting the account
        filter: Option<String>,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Import accounts from a text file of blank-line separated blocks
    Load {
        /// File to import
        file: String,
    },

    /// Print a freshly generated password
    Generate {
        /// Length (default from settings: 16)
        length: Option<usize>,
        /// Exclude symbols
        #[arg(short, long)]
        no_symbols: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// How the content of a new or edited account is obtained.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Generate the secret, optionally with the given length
    #[arg(short = 'g', long = "generate", value_name = "LEN")]
    pub generate: Option<Option<usize>>,

    /// Exclude symbols from generated secrets (implies --generate)
    #[arg(short = 'n', long)]
    pub no_symbols: bool,

    /// Ask for extra note lines until a blank line
    #[arg(short, long)]
    pub multiline: bool,
}

impl InputArgs {
    /// Length to generate, or `None` when the secret should be typed.
    pub fn generate_length(&self, default_len: usize) -> Option<usize> {
        match (self.generate, self.no_symbols) {
            (Some(len), _) => Some(len.unwrap_or(default_len)),
            (None, true) => Some(default_len),
            (None, false) => None,
        }
    }
}

/// Clipboard behaviour after a command.
#[derive(Args, Debug, Clone, Default)]
pub struct ClipArgs {
    /// Do not copy the secret to the clipboard
    #[arg(long)]
    pub no_clip: bool,

    /// Seconds to keep the secret on the clipboard
    #[arg(short = 't', long = "time", value_name = "SECS")]
    pub seconds: Option<u64>,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Full path of the store directory from the CLI arguments.
pub fn store_path(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(&cli.store_dir))
}

/// Get the master password, trying `PASSVAULT_PASSWORD` first and then
/// an interactive prompt.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            return Ok(Zeroizing::new(pw));
        }
    }

    let pw = input::read_secret(prompt)?.ok_or(PassVaultError::Cancelled)?;
    if pw.is_empty() {
        return Err(PassVaultError::Cancelled);
    }
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// Also respects `PASSVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        if !pw.is_empty() {
            if pw.len() < MIN_PASSWORD_LEN {
                return Err(PassVaultError::CommandFailed(format!(
                    "password must be at least {MIN_PASSWORD_LEN} characters"
                )));
            }
            return Ok(Zeroizing::new(pw));
        }
    }

    loop {
        let password = dialoguer::Password::new()
            .with_prompt("New master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// An opened store with an unlocked session.
pub struct Unlocked {
    pub settings: Settings,
    pub keys: KeyVault,
    pub session: Session,
    pub store: AccountStore,
}

/// Load settings, unlock the key vault, and open the account tree.
pub fn unlock(cli: &Cli) -> Result<Unlocked> {
    let root = store_path(cli)?;
    let settings = Settings::load(&root)?;
    let keys = KeyVault::new(&root, settings.argon2_params());
    if !keys.is_initialized() {
        return Err(PassVaultError::NotInitialized(root));
    }

    let password = prompt_password("Master password")?;
    let session = keys.unlock(password.as_bytes())?;
    let store = AccountStore::open(&root, &settings)?;

    Ok(Unlocked {
        settings,
        keys,
        session,
        store,
    })
}

/// Collect the lines of an account from the user (or the generator).
pub fn read_record(account: &str, args: &InputArgs, multiline: bool, settings: &Settings) -> Result<Vec<String>> {
    let prompt = format!("{account}> ");
    let mut lines = Vec::new();

    match args.generate_length(settings.generator.length) {
        Some(len) => lines.push(generate_password(len, !args.no_symbols)?),
        None => lines.push(input::read_secret(&prompt)?.ok_or(PassVaultError::Cancelled)?),
    }

    if multiline {
        while let Some(line) = input::read_line(&prompt)? {
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
    }

    Ok(lines)
}

/// Copy `secret` to the clipboard unless `--no-clip` was passed.
pub fn maybe_clip(secret: &str, clip: &ClipArgs, settings: &Settings) -> Result<()> {
    if clip.no_clip {
        return Ok(());
    }
    let seconds = clip.seconds.unwrap_or(settings.clipboard.seconds);
    clipboard::copy_temporarily(secret, seconds)
}
