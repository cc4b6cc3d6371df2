//! `passvault ls`: list accounts matching a filter.

use crate::cli::output::{self, AccountRow};
use crate::cli::{unlock, Cli};
use crate::errors::Result;
use crate::vault::paths::is_hidden;

/// Execute the `ls` command.
pub fn execute(cli: &Cli, filter: Option<&str>, all: bool) -> Result<()> {
    let unlocked = unlock(cli)?;
    let store = &unlocked.store;

    let rows: Vec<AccountRow> = store
        .list(filter.unwrap_or(""), all)
        .into_iter()
        .map(|name| {
            let backups = (!is_hidden(&name)).then(|| store.backups(&name).len());
            AccountRow { name, backups }
        })
        .collect();

    output::print_accounts_table(&rows);
    Ok(())
}
