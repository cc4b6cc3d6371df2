//! Master password handling: wrapping and unwrapping the data key.
//!
//! The key-encrypting key (KEK) is derived from the master password and
//! the salt in `.salt`; it is never stored.  The data key is random, and
//! is persisted only wrapped by the KEK in `.key`.  Changing the master
//! password rewraps the same data key, so no record is re-encrypted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::kdf::{derive_key, generate_salt, Argon2Params, SALT_LEN};
use super::keys::DataKey;
use super::token;
use crate::errors::{PassVaultError, Result};
use crate::vault::fs_ops::{restrict_permissions, temp_path, write_atomic};

/// File holding the raw salt bytes.
pub const SALT_FILE: &str = ".salt";

/// File holding the wrapped data key.
pub const KEY_FILE: &str = ".key";

/// Tag of the staged copies written before a salt/key swap.
const STAGE_TAG: &str = "new";

/// Current key file format version.
const KEY_FILE_VERSION: u8 = 1;

/// On-disk contents of `.key`.
#[derive(Debug, Serialize, Deserialize)]
struct KeyFile {
    version: u8,
    kdf: Argon2Params,
    wrapped_key: String,
}

/// Handle on the key material of one store root.
///
/// `params` is the work factor used for *new* wrappings (initialize and
/// rewrap).  Unlocking always uses the params recorded in `.key`.
pub struct KeyVault {
    root: PathBuf,
    params: Argon2Params,
}

impl KeyVault {
    pub fn new(root: &Path, params: Argon2Params) -> Self {
        Self {
            root: root.to_path_buf(),
            params,
        }
    }

    pub fn salt_path(&self) -> PathBuf {
        self.root.join(SALT_FILE)
    }

    pub fn key_path(&self) -> PathBuf {
        self.root.join(KEY_FILE)
    }

    /// `true` when both `.salt` and `.key` exist.
    pub fn is_initialized(&self) -> bool {
        self.salt_path().is_file() && self.key_path().is_file()
    }

    /// Generate salt and data key and persist the wrapped key.
    pub fn initialize(&self, password: &[u8]) -> Result<()> {
        self.recover()?;
        match (self.salt_path().exists(), self.key_path().exists()) {
            (true, true) => return Err(PassVaultError::AlreadyInitialized(self.root.clone())),
            (false, false) => {}
            _ => return Err(half_initialized()),
        }

        fs::create_dir_all(&self.root)?;

        let data_key = DataKey::generate();
        let salt = generate_salt();
        let key_file = self.wrap(&data_key, password, &salt)?;

        self.install(&salt, &key_file, None)?;

        tracing::info!(root = %self.root.display(), "initialized key material");
        Ok(())
    }

    /// Unwrap the data key with `password` and return a session holding it.
    ///
    /// The KDF always runs before the wrapped key is looked at, and every
    /// authentication failure maps to `InvalidCredential`.
    pub fn unlock(&self, password: &[u8]) -> Result<Session> {
        let (salt, key_file) = self.load()?;

        match unwrap_key(&key_file, password, &salt) {
            Ok(data_key) => {
                tracing::info!("logged in");
                Ok(Session { key: data_key })
            }
            Err(e) => {
                tracing::warn!("login failed: invalid master password");
                Err(e)
            }
        }
    }

    /// Replace the wrapping of the session's data key.
    ///
    /// `old_password` must unwrap the persisted key to the same data key
    /// the session holds.  A fresh salt is generated for the new wrapping.
    pub fn rewrap(&self, session: &Session, old_password: &[u8], new_password: &[u8]) -> Result<()> {
        let (old_salt, key_file) = self.load()?;

        let persisted = unwrap_key(&key_file, old_password, &old_salt)?;
        if !persisted.ct_eq(&session.key) {
            return Err(PassVaultError::InvalidCredential);
        }

        let new_salt = generate_salt();
        let new_key_file = self.wrap(&session.key, new_password, &new_salt)?;

        self.install(&new_salt, &new_key_file, Some(old_salt.as_slice()))?;

        tracing::info!("master password changed");
        Ok(())
    }

    /// Stage `salt` and `key_file` next to the live files, then rename
    /// the salt and the key into place in that order.
    ///
    /// On failure the live pair is put back: `previous_salt` is restored,
    /// or the new salt removed when there was none.
    fn install(&self, salt: &[u8], key_file: &[u8], previous_salt: Option<&[u8]>) -> Result<()> {
        let (salt_stage, key_stage) = self.stage_paths();
        let discard_stages = || {
            let _ = fs::remove_file(&salt_stage);
            let _ = fs::remove_file(&key_stage);
        };

        if let Err(e) = write_staged(&salt_stage, salt).and_then(|()| write_staged(&key_stage, key_file)) {
            discard_stages();
            return Err(e);
        }
        if let Err(e) = fs::rename(&salt_stage, self.salt_path()) {
            discard_stages();
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&key_stage, self.key_path()) {
            discard_stages();
            match previous_salt {
                Some(old) => write_atomic(&self.salt_path(), old)?,
                None => {
                    let _ = fs::remove_file(self.salt_path());
                }
            }
            return Err(e.into());
        }
        Ok(())
    }

    /// Finish or discard a swap that was interrupted between writes.
    ///
    /// A staged key without a staged salt means the salt was already
    /// renamed, so the key rename is completed.  Any other leftover
    /// stage predates the swap and is removed.
    fn recover(&self) -> Result<()> {
        let (salt_stage, key_stage) = self.stage_paths();
        if !salt_stage.is_file() && key_stage.is_file() && self.salt_path().is_file() {
            fs::rename(&key_stage, self.key_path())?;
            tracing::warn!("completed an interrupted key swap");
        } else if salt_stage.is_file() {
            let _ = fs::remove_file(&salt_stage);
            if key_stage.is_file() {
                let _ = fs::remove_file(&key_stage);
            }
            tracing::warn!("discarded staged key material from an interrupted swap");
        }
        Ok(())
    }

    fn stage_paths(&self) -> (PathBuf, PathBuf) {
        (
            temp_path(&self.salt_path(), STAGE_TAG),
            temp_path(&self.key_path(), STAGE_TAG),
        )
    }

    fn load(&self) -> Result<(Vec<u8>, KeyFile)> {
        self.recover()?;
        match (self.salt_path().is_file(), self.key_path().is_file()) {
            (true, true) => {}
            (false, false) => return Err(PassVaultError::NotInitialized(self.root.clone())),
            _ => return Err(half_initialized()),
        }

        let salt = fs::read(self.salt_path())?;
        if salt.len() != SALT_LEN {
            return Err(PassVaultError::InvalidKeyFile(format!(
                "salt must be {SALT_LEN} bytes, got {}",
                salt.len()
            )));
        }

        let contents = fs::read(self.key_path())?;
        let key_file: KeyFile = serde_json::from_slice(&contents)
            .map_err(|e| PassVaultError::InvalidKeyFile(format!("cannot parse {KEY_FILE}: {e}")))?;
        if key_file.version != KEY_FILE_VERSION {
            return Err(PassVaultError::InvalidKeyFile(format!(
                "unsupported key file version {}",
                key_file.version
            )));
        }

        Ok((salt, key_file))
    }

    fn wrap(&self, data_key: &DataKey, password: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
        if password.is_empty() {
            return Err(PassVaultError::InvalidCredential);
        }

        let mut kek = derive_key(password, salt, &self.params)?;
        let wrapped = token::seal(&kek, data_key.as_bytes());
        kek.zeroize();

        let key_file = KeyFile {
            version: KEY_FILE_VERSION,
            kdf: self.params,
            wrapped_key: wrapped?,
        };
        serde_json::to_vec_pretty(&key_file)
            .map_err(|e| PassVaultError::SerializationError(format!("key file: {e}")))
    }
}

fn unwrap_key(key_file: &KeyFile, password: &[u8], salt: &[u8]) -> Result<DataKey> {
    let mut kek = derive_key(password, salt, &key_file.kdf)?;
    let opened = token::open(&kek, &key_file.wrapped_key);
    kek.zeroize();

    if password.is_empty() {
        return Err(PassVaultError::InvalidCredential);
    }
    let raw = opened.map_err(|_| PassVaultError::InvalidCredential)?;
    DataKey::from_unwrapped(raw)
}

fn write_staged(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes)?;
    restrict_permissions(path);
    Ok(())
}

fn half_initialized() -> PassVaultError {
    PassVaultError::InvalidKeyFile(format!(
        "only one of {SALT_FILE} and {KEY_FILE} exists; refusing to continue"
    ))
}

/// An unlocked store: holds the data key until dropped.
pub struct Session {
    key: DataKey,
}

impl Session {
    /// Encrypt one line of text into a token.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        token::seal(self.key.as_bytes(), plaintext.as_bytes())
    }

    /// Decrypt a token produced by `encrypt` under the same data key.
    pub fn decrypt(&self, token: &str) -> Result<String> {
        let bytes = token::open(self.key.as_bytes(), token)?;
        String::from_utf8(bytes).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            PassVaultError::InvalidCiphertext
        })
    }
}
