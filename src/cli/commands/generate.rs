//! `passvault generate`: print a generated password.

use crate::cli::{store_path, Cli};
use crate::config::Settings;
use crate::errors::Result;
use crate::generator::generate_password;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>, no_symbols: bool) -> Result<()> {
    let settings = Settings::load(&store_path(cli)?)?;
    let password = generate_password(length.unwrap_or(settings.generator.length), !no_symbols)?;
    println!("{password}");
    Ok(())
}
