//! Mapping between account names and paths under the store root.
//!
//! Account names use `/` as the hierarchy separator regardless of
//! platform.  The same form is used for keys in the store index.

use std::path::{Component, Path, PathBuf};

use crate::errors::{PassVaultError, Result};

/// Hidden directory that mirrors the account tree with timestamped copies.
pub const BACKUP_DIR: &str = ".backup";

/// Default backup suffix format (local time, second granularity).
///
/// Two backups of the same account within one second share a name and
/// the later one overwrites the earlier.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%y%m%d%H%M%S";

/// Validate a name for a live account (write, create, move target).
pub fn validate_account_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(PassVaultError::InvalidAccountName(
            name.to_string(),
            reason.to_string(),
        ))
    };

    if name.is_empty() {
        return invalid("name cannot be empty");
    }
    if name.starts_with('.') || name.ends_with('.') {
        return invalid("name can't start or end with a '.' character");
    }
    if name.starts_with('/') || name.ends_with('/') {
        return invalid("name can't start or end with a '/' character");
    }
    if name.contains('\\') {
        return invalid("use '/' to separate name segments");
    }
    for segment in name.split('/') {
        if segment.is_empty() {
            return invalid("name contains an empty segment");
        }
        if segment.starts_with('.') || segment.ends_with('.') {
            return invalid("segments starting or ending with '.' are reserved");
        }
        if segment.trim() != segment {
            return invalid("segments can't start or end with whitespace");
        }
    }
    Ok(())
}

/// Check that `name` stays inside the store root.
///
/// Looser than `validate_account_name`: backup paths such as
/// `.backup/mail.240101120000` pass.
pub fn validate_lookup_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PassVaultError::NotFound(name.to_string()));
    }
    if name.starts_with('/') || name.contains('\\') {
        return Err(PassVaultError::InvalidAccountName(
            name.to_string(),
            "name must be relative".into(),
        ));
    }
    if name
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(PassVaultError::InvalidAccountName(
            name.to_string(),
            "name must not contain empty, '.' or '..' segments".into(),
        ));
    }
    Ok(())
}

/// Relative filesystem path for an account name.
pub fn to_relative_path(name: &str) -> PathBuf {
    name.split('/').collect()
}

/// Index key for a path relative to the store root.
///
/// Returns `None` for paths that are not plain relative file paths.
pub fn index_key(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?.to_string()),
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// `true` for index keys under the backup mirror.
pub fn is_hidden(key: &str) -> bool {
    key == BACKUP_DIR || key.starts_with(&format!("{BACKUP_DIR}/"))
}

/// Index key of a backup: `.backup/<name>.<stamp>`.
pub fn backup_key(name: &str, stamp: &str) -> String {
    format!("{}{stamp}", backup_prefix(name))
}

/// Prefix shared by every backup of `name`: `.backup/<name>.`.
pub fn backup_prefix(name: &str) -> String {
    format!("{BACKUP_DIR}/{name}.")
}

/// If `key` is a backup of `name`, return its timestamp suffix.
///
/// Backups of `mail.old` are not backups of `mail`: the suffix must not
/// contain `/` or `.`.
pub fn backup_suffix<'a>(key: &'a str, name: &str) -> Option<&'a str> {
    let suffix = key.strip_prefix(&backup_prefix(name))?;
    if suffix.is_empty() || suffix.contains('/') || suffix.contains('.') {
        return None;
    }
    Some(suffix)
}
