//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption (`encryption`)
//! - Argon2id password-based key derivation (`kdf`)
//! - Text tokens with an embedded timestamp (`token`)
//! - The data key type (`keys`)
//! - Master password handling and unlocked sessions (`master`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod master;
pub mod token;

pub use kdf::{derive_key, generate_salt, Argon2Params};
pub use keys::DataKey;
pub use master::{KeyVault, Session};
