//! Temporary clipboard copies.
//!
//! The secret stays on the clipboard for a fixed number of seconds,
//! with a countdown bar, then the previous clipboard text is restored.

use std::io::Write;
use std::thread;
use std::time::Duration;

use arboard::Clipboard;
use console::Term;

use crate::errors::{PassVaultError, Result};

/// Put `text` on the clipboard for `seconds`, then restore what was there.
pub fn copy_temporarily(text: &str, seconds: u64) -> Result<()> {
    let mut clipboard =
        Clipboard::new().map_err(|e| PassVaultError::ClipboardError(e.to_string()))?;
    let previous = clipboard.get_text().ok();

    clipboard
        .set_text(text.to_string())
        .map_err(|e| PassVaultError::ClipboardError(e.to_string()))?;
    tracing::debug!(seconds, "secret copied to clipboard");

    let mut term = Term::stdout();
    for remaining in (1..=seconds).rev() {
        let _ = write!(term, "\r{}", countdown_bar(remaining, seconds));
        let _ = term.flush();
        thread::sleep(Duration::from_secs(1));
    }
    let _ = term.clear_line();

    let restored = match previous {
        Some(old) => clipboard.set_text(old),
        None => clipboard.clear(),
    };
    restored.map_err(|e| PassVaultError::ClipboardError(e.to_string()))
}

/// `Copied to clipboard [====    ]`: one `=` per remaining second.
pub fn countdown_bar(remaining: u64, total: u64) -> String {
    let remaining = usize::try_from(remaining.min(total)).unwrap_or(0);
    let total = usize::try_from(total).unwrap_or(0);
    format!(
        "Copied to clipboard [{}{}]",
        "=".repeat(remaining),
        " ".repeat(total - remaining)
    )
}
