//! High-level account operations used by CLI commands.
//!
//! `AccountStore` owns the account tree under the store root, the
//! in-memory index of every file in it, and the `.backup` mirror.  All
//! filesystem mutation goes through here so the index never drifts from
//! what is on disk: each disk step that succeeds is recorded in the
//! index before the next one starts.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use walkdir::WalkDir;

use crate::config::Settings;
use crate::crypto::Session;
use crate::errors::{PassVaultError, Result};

use super::codec;
use super::fs_ops::{file_ancestor, prune_empty_dirs, restrict_permissions, write_atomic};
use super::paths::{
    backup_key, backup_suffix, index_key, is_hidden, to_relative_path, validate_account_name,
    validate_lookup_name, BACKUP_DIR,
};
use super::resolver::{self, Prompter};

/// The account store handle.  Create one with `AccountStore::open`.
pub struct AccountStore {
    /// Store root directory.
    root: PathBuf,

    /// Every known file path relative to the root, `/`-separated.
    index: BTreeSet<String>,

    /// strftime format of backup suffixes.
    backup_format: String,
}

impl AccountStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open the store at `root`, creating it and `.backup` if needed,
    /// and build the index with a full directory walk.
    pub fn open(root: &Path, settings: &Settings) -> Result<Self> {
        validate_backup_format(&settings.backup.timestamp_format)?;

        fs::create_dir_all(root.join(BACKUP_DIR))?;
        let index = build_index(root)?;
        tracing::debug!(root = %root.display(), entries = index.len(), "built store index");

        Ok(Self {
            root: root.to_path_buf(),
            index,
            backup_format: settings.backup.timestamp_format.clone(),
        })
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Every indexed path containing `filter`, sorted ascending.
    ///
    /// Backups are left out unless `include_hidden` is set or the filter
    /// itself starts with `.backup`.
    pub fn list(&self, filter: &str, include_hidden: bool) -> Vec<String> {
        let show_hidden = include_hidden || filter.starts_with(BACKUP_DIR);
        self.index
            .iter()
            .filter(|key| show_hidden || !is_hidden(key))
            .filter(|key| key.contains(filter))
            .cloned()
            .collect()
    }

    /// Pick exactly one account matching `filter`, asking `prompter` to
    /// disambiguate when several match.  Only a lone match is passed to
    /// `Prompter::confirm`.
    pub fn select<P: Prompter + ?Sized>(&self, filter: &str, prompter: &mut P) -> Result<String> {
        let mut matched = self.list(filter, false);
        let account = match matched.len() {
            0 => return Err(PassVaultError::NoMatch),
            1 => {
                let account = matched.remove(0);
                prompter.confirm(&account);
                account
            }
            _ => resolver::resolve(matched, prompter)?,
        };
        Ok(account)
    }

    /// `true` if `name` is a live (non-backup) account.
    pub fn contains(&self, name: &str) -> bool {
        !is_hidden(name) && self.index.contains(name)
    }

    /// Sorted backup paths of account `name`.
    pub fn backups(&self, name: &str) -> Vec<String> {
        self.index
            .iter()
            .filter(|key| backup_suffix(key, name).is_some())
            .cloned()
            .collect()
    }

    /// Decrypt every line of an account (or of a backup path).
    pub fn read(&self, session: &Session, name: &str) -> Result<Vec<String>> {
        validate_lookup_name(name)?;
        let path = self.path_of(name);
        if !path.is_file() {
            return Err(PassVaultError::NotFound(name.to_string()));
        }

        let contents = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => PassVaultError::InvalidCiphertext,
            _ => PassVaultError::Io(e),
        })?;
        let tokens = codec::from_file_contents(&contents);
        if tokens.is_empty() {
            return Err(PassVaultError::InvalidCiphertext);
        }
        codec::decode(session, &tokens)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Write (or overwrite) an account, then back it up.
    pub fn write<S: AsRef<str>>(&mut self, session: &Session, name: &str, lines: &[S]) -> Result<()> {
        validate_account_name(name)?;
        let lines = normalize_record(name, lines)?;

        let path = self.path_of(name);
        self.check_destination(name, &path)?;

        let tokens = codec::encode(session, &lines)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_atomic(&path, codec::to_file_contents(&tokens).as_bytes())?;
        self.index.insert(name.to_string());
        tracing::info!(account = name, lines = lines.len(), "wrote account");

        self.backup(name)?;
        Ok(())
    }

    /// Like `write`, but refuses to replace an existing account.
    pub fn create<S: AsRef<str>>(&mut self, session: &Session, name: &str, lines: &[S]) -> Result<()> {
        validate_account_name(name)?;
        if self.path_of(name).is_file() {
            return Err(PassVaultError::NameExists(name.to_string()));
        }
        self.write(session, name, lines)
    }

    /// Delete a live account and prune empty parent directories.
    /// Its backups stay where they are.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        validate_lookup_name(name)?;
        if !self.contains(name) {
            return Err(PassVaultError::NotFound(name.to_string()));
        }

        let path = self.path_of(name);
        fs::remove_file(&path)?;
        prune_empty_dirs(&self.root, &path);
        self.index.remove(name);

        tracing::info!(account = name, "removed account");
        Ok(())
    }

    /// Rename an account and carry all of its backups along.
    ///
    /// Backup suffixes are preserved unless the target name already owns
    /// a backup with the same suffix (left behind by a removed account);
    /// the moved one then gets a `-<n>` suffix instead.  If a step fails,
    /// the index reflects the steps that did complete.
    pub fn move_account(&mut self, from: &str, to: &str) -> Result<()> {
        validate_lookup_name(from)?;
        if !self.contains(from) {
            return Err(PassVaultError::NotFound(from.to_string()));
        }
        validate_account_name(to)?;

        let src = self.path_of(from);
        let dst = self.path_of(to);
        if dst.is_file() {
            return Err(PassVaultError::NameExists(to.to_string()));
        }
        self.check_destination(to, &dst)?;

        let moves = self.plan_backup_moves(from, to);

        // 1. The live file.
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(&src, &dst)?;
        self.index.remove(from);
        self.index.insert(to.to_string());
        prune_empty_dirs(&self.root, &src);

        // 2. Every backup of the old name.
        if let Some((first_old, first_new)) = moves.first() {
            let old_dir_probe = self.path_of(first_old);
            if let Some(parent) = self.path_of(first_new).parent() {
                fs::create_dir_all(parent)?;
            }

            for (old_key, new_key) in &moves {
                fs::rename(self.path_of(old_key), self.path_of(new_key))?;
                self.index.remove(old_key);
                self.index.insert(new_key.clone());
            }

            prune_empty_dirs(&self.root.join(BACKUP_DIR), &old_dir_probe);
        }

        tracing::info!(from, to, backups = moves.len(), "moved account");
        Ok(())
    }

    /// Pair every backup of `from` with a free backup key of `to`.
    fn plan_backup_moves(&self, from: &str, to: &str) -> Vec<(String, String)> {
        let mut planned = BTreeSet::new();
        let mut moves = Vec::new();
        for key in &self.index {
            let Some(suffix) = backup_suffix(key, from) else {
                continue;
            };
            let mut target = backup_key(to, suffix);
            let mut n = 1;
            while planned.contains(&target)
                || self.index.contains(&target)
                || self.path_of(&target).exists()
            {
                target = backup_key(to, &format!("{suffix}-{n}"));
                n += 1;
            }
            planned.insert(target.clone());
            moves.push((key.clone(), target));
        }
        moves
    }

    /// Copy the current ciphertext of `name` into the backup mirror.
    ///
    /// Returns the index key of the new backup.  A backup taken in the
    /// same second as a previous one replaces it.
    pub fn backup(&mut self, name: &str) -> Result<String> {
        let src = self.path_of(name);
        if !src.is_file() {
            return Err(PassVaultError::NotFound(name.to_string()));
        }

        let mut stamp = String::new();
        write!(stamp, "{}", Local::now().format(&self.backup_format)).map_err(|_| {
            PassVaultError::ConfigError(format!(
                "invalid backup timestamp format '{}'",
                self.backup_format
            ))
        })?;

        let key = backup_key(name, &stamp);
        let dst = self.path_of(&key);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&src, &dst)?;
        restrict_permissions(&dst);
        self.index.insert(key.clone());

        tracing::info!(account = name, backup = %key, "backed up account");
        Ok(key)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of an index key.
    pub fn path_of(&self, key: &str) -> PathBuf {
        self.root.join(to_relative_path(key))
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    fn check_destination(&self, name: &str, path: &Path) -> Result<()> {
        if let Some(blocker) = file_ancestor(&self.root, path) {
            let blocker = blocker
                .strip_prefix(&self.root)
                .ok()
                .and_then(index_key)
                .unwrap_or_default();
            return Err(PassVaultError::PathConflict(name.to_string(), blocker));
        }
        if path.is_dir() {
            return Err(PassVaultError::IsDirectory(name.to_string()));
        }
        Ok(())
    }
}

/// Trim every line and drop blank ones.
///
/// Fails with `EmptyRecord` if nothing is left, and with
/// `SecretContainsSpace` if the first line (the secret) has whitespace.
pub fn normalize_record<S: AsRef<str>>(name: &str, lines: &[S]) -> Result<Vec<String>> {
    let lines: Vec<String> = lines
        .iter()
        .flat_map(|line| line.as_ref().lines())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    match lines.first() {
        None => Err(PassVaultError::EmptyRecord(name.to_string())),
        Some(secret) if secret.chars().any(char::is_whitespace) => {
            Err(PassVaultError::SecretContainsSpace)
        }
        Some(_) => Ok(lines),
    }
}

fn validate_backup_format(format: &str) -> Result<()> {
    if format.is_empty()
        || format.contains('/')
        || format.contains('.')
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
    {
        return Err(PassVaultError::ConfigError(format!(
            "backup timestamp_format '{format}' must be a non-empty strftime pattern without '/' or '.'"
        )));
    }
    Ok(())
}

fn build_index(root: &Path) -> Result<BTreeSet<String>> {
    let mut index = BTreeSet::new();

    let walker = WalkDir::new(root).min_depth(1).into_iter().filter_entry(|entry| {
        let name = entry.file_name().to_string_lossy();
        !entry.file_type().is_dir()
            || !name.starts_with('.')
            || (entry.depth() == 1 && name == BACKUP_DIR)
    });

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() || entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let key = entry
            .path()
            .strip_prefix(root)
            .ok()
            .and_then(index_key);
        if let Some(key) = key {
            index.insert(key);
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_drops_blank_lines() {
        let lines = normalize_record("a", &["  s3cret ", "", "   ", " note one "]).unwrap();
        assert_eq!(lines, vec!["s3cret", "note one"]);
    }

    #[test]
    fn normalize_rejects_empty_record() {
        assert!(matches!(
            normalize_record("a", &["", "  "]),
            Err(PassVaultError::EmptyRecord(_))
        ));
        assert!(matches!(
            normalize_record::<&str>("a", &[]),
            Err(PassVaultError::EmptyRecord(_))
        ));
    }

    #[test]
    fn normalize_rejects_whitespace_in_secret() {
        assert!(matches!(
            normalize_record("a", &["two words"]),
            Err(PassVaultError::SecretContainsSpace)
        ));
        assert!(matches!(
            normalize_record("a", &["tab\there"]),
            Err(PassVaultError::SecretContainsSpace)
        ));
        assert!(normalize_record("a", &["oneword", "notes may have spaces"]).is_ok());
    }

    #[test]
    fn normalize_splits_embedded_newlines() {
        let lines = normalize_record("a", &["pw\nnote"]).unwrap();
        assert_eq!(lines, vec!["pw", "note"]);
    }

    #[test]
    fn backup_format_validation() {
        assert!(validate_backup_format("%y%m%d%H%M%S").is_ok());
        assert!(validate_backup_format("%Y%m%d%H%M%S%6f").is_ok());
        assert!(validate_backup_format("").is_err());
        assert!(validate_backup_format("%Y.%m").is_err());
        assert!(validate_backup_format("%Y/%m").is_err());
        assert!(validate_backup_format("%Q").is_err());
    }
}
