//! Vault module: the encrypted account tree.
//!
//! This module provides:
//! - Account name rules and the name <-> path mapping (`paths`)
//! - The one-token-per-line record codec (`codec`)
//! - Atomic writes and directory pruning (`fs_ops`)
//! - Interactive disambiguation of name fragments (`resolver`)
//! - High-level `AccountStore` with the index and backup mirror (`store`)

pub mod codec;
pub mod fs_ops;
pub mod paths;
pub mod resolver;
pub mod store;

// Re-export the most commonly used items.
pub use paths::{BACKUP_DIR, BACKUP_TIMESTAMP_FORMAT};
pub use resolver::{Prompter, ScriptedPrompter};
pub use store::AccountStore;
