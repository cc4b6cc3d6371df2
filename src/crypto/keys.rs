//! The data key: the random symmetric key that encrypts record lines.

use rand::RngCore;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use super::kdf::KEY_LEN;
use crate::errors::{PassVaultError, Result};

/// A wrapper around a 32-byte data key that automatically zeroes
/// its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DataKey {
    bytes: [u8; KEY_LEN],
}

impl DataKey {
    /// Generate a fresh random data key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Rebuild a data key from unwrapped bytes.
    ///
    /// The input is zeroized whether or not it has the right length.
    pub fn from_unwrapped(mut raw: Vec<u8>) -> Result<Self> {
        if raw.len() != KEY_LEN {
            raw.zeroize();
            return Err(PassVaultError::InvalidKeyFile(
                "wrapped data key has the wrong length".into(),
            ));
        }
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&raw);
        raw.zeroize();
        Ok(Self { bytes })
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Constant-time equality.
    pub fn ct_eq(&self, other: &DataKey) -> bool {
        self.bytes.ct_eq(&other.bytes).into()
    }
}
