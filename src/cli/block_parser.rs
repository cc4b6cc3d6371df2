//! Parsing of `load` files.
//!
//! Accounts are written as blocks separated by blank lines.  The first
//! line of a block is the account name, the rest are its record lines
//! (secret first):
//!
//! ```text
//! mail/work
//! s3cr3t
//! user: me@example.com
//!
//! bank
//! hunter2
//! ```

use std::fs;
use std::path::Path;

use crate::errors::{PassVaultError, Result};

/// One account read from a `load` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub name: String,
    pub lines: Vec<String>,
}

/// Split text into blocks.
///
/// `.` in names is replaced with `-`, since dots are reserved for
/// backup suffixes.  Runs of blank lines count as one separator.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if let Some((name, lines)) = current.split_first() {
                blocks.push(Block {
                    name: name.trim().replace('.', "-"),
                    lines: lines.iter().map(|l| l.to_string()).collect(),
                });
            }
            current.clear();
        } else {
            current.push(line);
        }
    }

    blocks
}

/// Read and parse a `load` file.
pub fn parse_block_file(path: &Path) -> Result<Vec<Block>> {
    let content = fs::read_to_string(path)
        .map_err(|e| PassVaultError::CommandFailed(format!("failed to read file: {e}")))?;
    Ok(parse_blocks(&content))
}
