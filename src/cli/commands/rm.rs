//! `passvault rm`: delete an account.  Its backups are kept.

use dialoguer::Confirm;

use crate::cli::input::TerminalPrompter;
use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `rm` command.
pub fn execute(cli: &Cli, filter: Option<&str>, yes: bool) -> Result<()> {
    let mut unlocked = unlock(cli)?;
    let account = unlocked
        .store
        .select(filter.unwrap_or(""), &mut TerminalPrompter)?;

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete account '{account}'?"))
            .default(false)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    unlocked.store.remove(&account)?;
    output::success(&format!("Deleted account '{account}'"));
    Ok(())
}
