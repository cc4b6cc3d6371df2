//! `passvault mv`: rename an account together with its backups.

use crate::cli::input::TerminalPrompter;
use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::Result;

/// Execute the `mv` command.
pub fn execute(cli: &Cli, filter: &str, to: &str) -> Result<()> {
    let mut unlocked = unlock(cli)?;
    let from = unlocked.store.select(filter, &mut TerminalPrompter)?;

    unlocked.store.move_account(&from, to)?;
    output::success(&format!("Renamed '{from}' to '{to}'"));
    Ok(())
}
