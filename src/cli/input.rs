//! Line input for prompts.
//!
//! On a terminal the `dialoguer` widgets are used; when stdin is piped,
//! lines are read straight from it so the binary stays scriptable.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::{Input, Password};

use crate::cli::output;
use crate::errors::{PassVaultError, Result};
use crate::vault::resolver::{self, Prompter};

/// Read one visible line.  `None` at end of input.
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    if io::stdin().is_terminal() {
        let line: String = Input::new()
            .with_prompt(prompt.trim_end())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))?;
        return Ok(Some(line));
    }
    read_piped_line(prompt)
}

/// Read one hidden line (passwords and secrets).  `None` at end of input.
pub fn read_secret(prompt: &str) -> Result<Option<String>> {
    if io::stdin().is_terminal() {
        let line = Password::new()
            .with_prompt(prompt.trim_end())
            .allow_empty_password(true)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;
        return Ok(Some(line));
    }
    read_piped_line(prompt)
}

fn read_piped_line(prompt: &str) -> Result<Option<String>> {
    eprint!("{prompt}");
    io::stderr().flush()?;

    let mut buf = String::new();
    if io::stdin().lock().read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
}

/// `Prompter` backed by the terminal.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn show_candidates(&mut self, candidates: &[String]) {
        for line in resolver::enumerate(candidates) {
            println!("{line}");
        }
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        read_line(prompt)
    }

    fn confirm(&mut self, account: &str) {
        output::selected(account);
    }
}
