//! `passvault copy`: put an account's secret on the clipboard.

use crate::cli::input::TerminalPrompter;
use crate::cli::{maybe_clip, unlock, ClipArgs, Cli};
use crate::errors::Result;

/// Execute the `copy` command.
pub fn execute(cli: &Cli, filter: Option<&str>, clip: &ClipArgs) -> Result<()> {
    let unlocked = unlock(cli)?;
    let account = unlocked
        .store
        .select(filter.unwrap_or(""), &mut TerminalPrompter)?;

    let lines = unlocked.store.read(&unlocked.session, &account)?;
    maybe_clip(&lines[0], clip, &unlocked.settings)
}
