//! Interactive disambiguation of a name fragment that matches several
//! accounts.
//!
//! The candidates are shown sorted and numbered from 0.  Each answer is
//! either an index into the displayed list, a further substring filter,
//! or an empty line to cancel.

use crate::errors::{PassVaultError, Result};

/// Prompt shown while waiting for an index or filter.
pub const INDEX_PROMPT: &str = "index> ";

/// The I/O seam between the store and whoever is at the keyboard.
pub trait Prompter {
    /// Display the enumerated candidate list.
    fn show_candidates(&mut self, candidates: &[String]);

    /// Read one line of input.  `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Announce an account that was the only match of a filter.
    fn confirm(&mut self, account: &str);
}

/// Format candidates as `"<index>. <name>"`, indices right-aligned.
pub fn enumerate(candidates: &[String]) -> Vec<String> {
    let width = candidates.len().saturating_sub(1).to_string().len();
    candidates
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{i:>width$}. {name}"))
        .collect()
}

/// Narrow `candidates` down to one name.
///
/// Loops rather than recursing, so repeated ambiguous filters cannot
/// grow the stack.
pub fn resolve<P: Prompter + ?Sized>(candidates: Vec<String>, prompter: &mut P) -> Result<String> {
    let mut displayed = candidates;
    displayed.sort();
    displayed.dedup();

    if let [only] = displayed.as_slice() {
        return Ok(only.clone());
    }
    if displayed.is_empty() {
        return Err(PassVaultError::NoMatch);
    }

    prompter.show_candidates(&displayed);
    loop {
        let input = match prompter.read_line(INDEX_PROMPT)? {
            Some(line) => line.trim().to_string(),
            None => return Err(PassVaultError::Cancelled),
        };
        if input.is_empty() {
            return Err(PassVaultError::Cancelled);
        }

        if let Ok(index) = input.parse::<i64>() {
            match usize::try_from(index).ok().and_then(|i| displayed.get(i)) {
                Some(name) => return Ok(name.clone()),
                None => continue,
            }
        }

        let narrowed: Vec<String> = displayed
            .iter()
            .filter(|name| name.contains(input.as_str()))
            .cloned()
            .collect();

        match narrowed.len() {
            0 => continue,
            1 => return Ok(narrowed[0].clone()),
            _ => {
                displayed = narrowed;
                prompter.show_candidates(&displayed);
            }
        }
    }
}

/// A `Prompter` fed from a fixed script, recording what it was shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: std::collections::VecDeque<String>,
    /// Every candidate list shown, in order.
    pub shown: Vec<Vec<String>>,
    /// Every confirmed account, in order.
    pub confirmed: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn show_candidates(&mut self, candidates: &[String]) {
        self.shown.push(candidates.to_vec());
    }

    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(self.answers.pop_front())
    }

    fn confirm(&mut self, account: &str) {
        self.confirmed.push(account.to_string());
    }
}
