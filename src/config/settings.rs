use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::Argon2Params;
use crate::errors::{PassVaultError, Result};
use crate::vault::paths::BACKUP_TIMESTAMP_FORMAT;

/// Store-level configuration, loaded from `<store>/.passvault.toml`.
///
/// ```toml
/// [kdf]
/// memory_kib = 65536
/// iterations = 3
/// parallelism = 4
///
/// [backup]
/// timestamp_format = "%y%m%d%H%M%S"
///
/// [clipboard]
/// seconds = 20
///
/// [generator]
/// length = 16
/// ```
///
/// Every table and key is optional; a missing file means all defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Work factor for new wrappings of the data key.  Existing key files
    /// keep the params they were written with.
    pub kdf: Argon2Params,
    pub backup: BackupSettings,
    pub clipboard: ClipboardSettings,
    pub generator: GeneratorSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackupSettings {
    /// strftime pattern for backup suffixes.  Must not produce `/` or `.`.
    pub timestamp_format: String,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            timestamp_format: BACKUP_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClipboardSettings {
    /// Seconds a copied secret stays on the clipboard.
    pub seconds: u64,
}

impl Default for ClipboardSettings {
    fn default() -> Self {
        Self { seconds: 20 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    /// Length of generated passwords.
    pub length: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self { length: 16 }
    }
}

impl Settings {
    /// Name of the config file in the store root.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings for the store at `store_dir`.
    ///
    /// A missing file yields the defaults; a file that does not parse is
    /// a `ConfigError`.
    pub fn load(store_dir: &Path) -> Result<Self> {
        let config_path = Self::path(store_dir);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn path(store_dir: &Path) -> PathBuf {
        store_dir.join(Self::FILE_NAME)
    }

    pub fn argon2_params(&self) -> Argon2Params {
        self.kdf
    }
}
