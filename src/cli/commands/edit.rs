//! `passvault edit`: replace the content of an account.
//!
//! The current lines are shown first.  The old ciphertext stays
//! available in the backup mirror.

use crate::cli::input::TerminalPrompter;
use crate::cli::output;
use crate::cli::{maybe_clip, read_record, unlock, ClipArgs, Cli, InputArgs};
use crate::errors::Result;

/// Execute the `edit` command.
pub fn execute(cli: &Cli, filter: Option<&str>, input: &InputArgs, clip: &ClipArgs) -> Result<()> {
    let mut unlocked = unlock(cli)?;
    let account = unlocked
        .store
        .select(filter.unwrap_or(""), &mut TerminalPrompter)?;

    let current = unlocked.store.read(&unlocked.session, &account)?;
    println!("{}", current.join("\n"));
    println!();

    let multiline = input.multiline || current.len() > 1;
    let lines = read_record(&account, input, multiline, &unlocked.settings)?;
    unlocked.store.write(&unlocked.session, &account, &lines)?;
    output::success(&format!("Account '{account}' updated"));

    let saved = unlocked.store.read(&unlocked.session, &account)?;
    maybe_clip(&saved[0], clip, &unlocked.settings)
}
