//! `passvault add`: create a new account.

use crate::cli::output;
use crate::cli::{maybe_clip, read_record, unlock, ClipArgs, Cli, InputArgs};
use crate::errors::{PassVaultError, Result};
use crate::vault::paths::validate_account_name;

/// Execute the `add` command.
pub fn execute(cli: &Cli, account: &str, input: &InputArgs, clip: &ClipArgs) -> Result<()> {
    validate_account_name(account)?;
    let mut unlocked = unlock(cli)?;

    // Fail before asking for content if the name is taken.
    let path = unlocked.store.path_of(account);
    if path.is_file() {
        return Err(PassVaultError::NameExists(account.to_string()));
    }
    if path.is_dir() {
        return Err(PassVaultError::IsDirectory(account.to_string()));
    }

    let lines = read_record(account, input, input.multiline, &unlocked.settings)?;
    unlocked.store.create(&unlocked.session, account, &lines)?;
    output::success(&format!("Account '{account}' added"));

    let saved = unlocked.store.read(&unlocked.session, account)?;
    maybe_clip(&saved[0], clip, &unlocked.settings)
}
