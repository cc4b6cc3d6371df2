//! `passvault init`: create a new store and choose the master password.

use crate::cli::output;
use crate::cli::{prompt_new_password, store_path, Cli};
use crate::config::Settings;
use crate::crypto::KeyVault;
use crate::errors::{PassVaultError, Result};
use crate::vault::AccountStore;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let root = store_path(cli)?;

    // 1. Refuse to touch an existing store.
    let settings = Settings::load(&root)?;
    let keys = KeyVault::new(&root, settings.argon2_params());
    if keys.is_initialized() {
        output::tip("Use `passvault master` to change the master password.");
        return Err(PassVaultError::AlreadyInitialized(root));
    }

    // 2. Prompt for a new password (with confirmation).
    let password = prompt_new_password()?;

    // 3. Write salt and wrapped data key, then lay out the account tree.
    keys.initialize(password.as_bytes())?;
    AccountStore::open(&root, &settings)?;

    output::success(&format!("Store created at {}", root.display()));
    output::tip("Run `passvault add <ACCOUNT>` to add an account.");
    output::tip("Run `passvault ls` to see all accounts.");

    Ok(())
}
