//! Configuration loading helpers.

use std::path::{Path, PathBuf};

/// Search upward from the current directory for a config file.
///
/// Returns the first `dir/<name>` that exists, walking from cwd to the
/// filesystem root. `None` when no ancestor carries the file.
pub fn find_config_file(name: &Path) -> Option<PathBuf> {
    // Absolute paths are taken as-is
    if name.is_absolute() {
        return name.exists().then(|| name.to_path_buf());
    }

    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}
