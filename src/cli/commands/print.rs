//! `passvault print`: print every line of an account.

use crate::cli::input::TerminalPrompter;
use crate::cli::{unlock, Cli};
use crate::errors::Result;

/// Execute the `print` command.
pub fn execute(cli: &Cli, filter: Option<&str>) -> Result<()> {
    let unlocked = unlock(cli)?;
    let account = unlocked
        .store
        .select(filter.unwrap_or(""), &mut TerminalPrompter)?;

    let lines = unlocked.store.read(&unlocked.session, &account)?;
    println!("{}", lines.join("\n"));
    Ok(())
}
