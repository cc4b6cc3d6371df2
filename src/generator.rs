//! Random password generation.
//!
//! Characters that are easy to confuse (`l`, `o`, `I`, `O`, `0`, `1`)
//! are left out of the alphabet.  Every character group in use appears
//! at least once in the result.

use rand::Rng;

use crate::errors::{PassVaultError, Result};

/// Shortest password `generate_password` will produce.
pub const MIN_LENGTH: usize = 8;

const LOWER: &str = "abcdefghijkmnpqrstuvwxyz";
const UPPER: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ";
const DIGITS: &str = "23456789";
const SYMBOLS: &str = "!@#$%^&*()-+=.,?<>_:{}|*/";

/// Generate a password of `length` characters, with or without symbols.
pub fn generate_password(length: usize, symbols: bool) -> Result<String> {
    if length < MIN_LENGTH {
        return Err(PassVaultError::CommandFailed(format!(
            "password must be at least {MIN_LENGTH} characters long"
        )));
    }

    let mut groups = vec![LOWER, UPPER, DIGITS];
    if symbols {
        groups.push(SYMBOLS);
    }
    let alphabet: Vec<char> = groups.concat().chars().collect();

    let mut rng = rand::rng();
    loop {
        let password: String = (0..length)
            .map(|_| alphabet[rng.random_range(0..alphabet.len())])
            .collect();

        if groups
            .iter()
            .all(|group| password.chars().any(|c| group.contains(c)))
        {
            return Ok(password);
        }
    }
}
