//! Small filesystem helpers shared by the key files and the account tree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Write `bytes` to `path` atomically.
///
/// The data goes to a dot-prefixed temp file in the same directory first
/// and is then renamed over the destination, so readers never observe a
/// truncated file.  Dot-prefixed names are never indexed as accounts.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp_path = temp_path(path, "tmp");
    let result = fs::write(&tmp_path, bytes).and_then(|()| {
        restrict_permissions(&tmp_path);
        fs::rename(&tmp_path, path)
    });

    if let Err(e) = result {
        if tmp_path.is_file() {
            let _ = fs::remove_file(&tmp_path);
        }
        return Err(e.into());
    }
    Ok(())
}

/// Sibling temp path: `<dir>/.<file_name>.<tag>`.
pub fn temp_path(path: &Path, tag: &str) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.{tag}",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// On Unix, restrict a store file to owner-only read/write.
pub fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    let _ = path;
}

/// Remove now-empty directories from the parent of `path` upwards.
///
/// The ascent stops strictly below `root`, and at the first directory
/// that cannot be removed (usually because it is not empty).
pub fn prune_empty_dirs(root: &Path, path: &Path) {
    let mut current = path.parent();
    while let Some(dir) = current {
        if dir == root || !dir.starts_with(root) {
            break;
        }
        if fs::remove_dir(dir).is_err() {
            break;
        }
        tracing::debug!(dir = %dir.display(), "pruned empty directory");
        current = dir.parent();
    }
}

/// Return the first ancestor of `path` (strictly between `root` and
/// `path`) that exists as a regular file.
pub fn file_ancestor(root: &Path, path: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(root).ok()?;
    let mut current = root.to_path_buf();
    let mut components = relative.components().peekable();
    while let Some(component) = components.next() {
        if components.peek().is_none() {
            break;
        }
        current.push(component);
        if current.is_file() {
            return Some(current);
        }
    }
    None
}
