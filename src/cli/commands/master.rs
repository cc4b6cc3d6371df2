//! `passvault master`: change the master password.
//!
//! Only the wrapping of the data key changes; account files are not
//! touched, so no record is re-encrypted.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{prompt_new_password, prompt_password, store_path, Cli};
use crate::config::Settings;
use crate::crypto::KeyVault;
use crate::errors::{PassVaultError, Result};

/// Execute the `master` command.
pub fn execute(cli: &Cli, yes: bool) -> Result<()> {
    let root = store_path(cli)?;
    let settings = Settings::load(&root)?;
    let keys = KeyVault::new(&root, settings.argon2_params());
    if !keys.is_initialized() {
        return Err(PassVaultError::NotInitialized(root));
    }

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Change the master password of this store?")
            .default(true)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;
        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    // 1. Unlock with the current password.
    let old_password = prompt_password("Current master password")?;
    let session = keys.unlock(old_password.as_bytes())?;

    // 2. Rewrap the same data key under the new password.
    output::info("Choose your new master password.");
    let new_password = prompt_new_password()?;
    keys.rewrap(&session, old_password.as_bytes(), new_password.as_bytes())?;

    output::success("Master password changed");
    Ok(())
}
