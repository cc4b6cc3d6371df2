//! Store-level configuration.

pub mod settings;

pub use settings::{BackupSettings, ClipboardSettings, GeneratorSettings, Settings};
