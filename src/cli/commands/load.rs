//! `passvault load`: import accounts from a block file.
//!
//! Blocks that collide with existing accounts, or that are invalid, are
//! reported and skipped; the rest are imported.

use std::path::Path;

use crate::cli::block_parser::parse_block_file;
use crate::cli::output;
use crate::cli::{unlock, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `load` command.
pub fn execute(cli: &Cli, file_path: &str) -> Result<()> {
    let source = Path::new(file_path);
    if !source.exists() {
        return Err(PassVaultError::CommandFailed(format!(
            "load file not found: {}",
            source.display()
        )));
    }

    let blocks = parse_block_file(source)?;
    if blocks.is_empty() {
        output::warning("No accounts found in the load file.");
        return Ok(());
    }

    let mut unlocked = unlock(cli)?;
    let mut count = 0;
    for block in &blocks {
        match unlocked
            .store
            .create(&unlocked.session, &block.name, &block.lines)
        {
            Ok(()) => {
                output::info(&format!("  + {}", block.name));
                count += 1;
            }
            Err(e) if e.is_domain() => output::error(&e.to_string()),
            Err(e) => return Err(e),
        }
    }

    tracing::info!(count, skipped = blocks.len() - count, "loaded accounts");
    output::success(&format!(
        "Loaded {count} of {} accounts from {}",
        blocks.len(),
        source.display()
    ));
    Ok(())
}
