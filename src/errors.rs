use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Key vault errors ---
    #[error("Store already initialized at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Store not initialized at {0}; run `passvault init` first")]
    NotInitialized(PathBuf),

    #[error("Invalid key file: {0}")]
    InvalidKeyFile(String),

    #[error("Invalid master password")]
    InvalidCredential,

    #[error("Decryption failed: corrupted data or wrong data key")]
    InvalidCiphertext,

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Account store errors ---
    #[error("Account '{0}' not found")]
    NotFound(String),

    #[error("Account '{0}' already exists")]
    NameExists(String),

    #[error("'{0}' is an existing directory")]
    IsDirectory(String),

    #[error("Cannot create '{0}': '{1}' is an existing account file")]
    PathConflict(String, String),

    #[error("Invalid account name '{0}': {1}")]
    InvalidAccountName(String, String),

    #[error("Blank secret for account '{0}'")]
    EmptyRecord(String),

    #[error("Secret cannot contain whitespace")]
    SecretContainsSpace,

    #[error("No matching account")]
    NoMatch,

    #[error("User cancelled operation")]
    Cancelled,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

impl PassVaultError {
    /// Returns `true` when the error describes invalid input or store
    /// state, and `false` when the environment failed (IO, clipboard, ...).
    pub fn is_domain(&self) -> bool {
        !matches!(
            self,
            Self::Io(_)
                | Self::EncryptionFailed(_)
                | Self::KeyDerivationFailed(_)
                | Self::SerializationError(_)
                | Self::ConfigError(_)
                | Self::ClipboardError(_)
                | Self::CommandFailed(_)
        )
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
