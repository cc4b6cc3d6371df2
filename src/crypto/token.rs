//! Text tokens: authenticated ciphertext safe to store one per line.
//!
//! ```text
//! base64url( [version: 1 byte][created_at: u64 BE][nonce: 12][ciphertext + tag: 16] )
//! ```
//!
//! The version byte and the timestamp are bound as AES-GCM associated
//! data, so every byte of a token is covered by the authentication tag.

use base64::engine::general_purpose::URL_SAFE as BASE64;
use base64::Engine;
use chrono::Utc;

use super::encryption::{self, NONCE_LEN, TAG_LEN};
use crate::errors::{PassVaultError, Result};

/// Current token format version.
pub const TOKEN_VERSION: u8 = 0x01;

/// Version byte + timestamp.
const HEADER_LEN: usize = 1 + 8;

/// Encrypt `plaintext` into a base64url token stamped with the current time.
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<String> {
    let created_at = u64::try_from(Utc::now().timestamp()).unwrap_or(0);

    let mut header = [0u8; HEADER_LEN];
    header[0] = TOKEN_VERSION;
    header[1..].copy_from_slice(&created_at.to_be_bytes());

    let sealed = encryption::encrypt(key, plaintext, &header)?;

    let mut raw = Vec::with_capacity(HEADER_LEN + sealed.len());
    raw.extend_from_slice(&header);
    raw.extend_from_slice(&sealed);
    Ok(BASE64.encode(raw))
}

/// Decrypt a token produced by `seal`.
pub fn open(key: &[u8], token: &str) -> Result<Vec<u8>> {
    let raw = decode(token)?;
    let (header, sealed) = raw.split_at(HEADER_LEN);
    encryption::decrypt(key, sealed, header)
}

/// Read the creation time embedded in a token without decrypting it.
///
/// The value is unauthenticated until the token is opened.
pub fn created_at(token: &str) -> Result<u64> {
    let raw = decode(token)?;
    let mut stamp = [0u8; 8];
    stamp.copy_from_slice(&raw[1..HEADER_LEN]);
    Ok(u64::from_be_bytes(stamp))
}

fn decode(token: &str) -> Result<Vec<u8>> {
    let raw = BASE64
        .decode(token.trim().as_bytes())
        .map_err(|_| PassVaultError::InvalidCiphertext)?;

    if raw.len() < HEADER_LEN + NONCE_LEN + TAG_LEN || raw[0] != TOKEN_VERSION {
        return Err(PassVaultError::InvalidCiphertext);
    }
    Ok(raw)
}
