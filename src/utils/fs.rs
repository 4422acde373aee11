//! Filesystem helpers shared by the pipeline steps.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, content: impl AsRef<[u8]>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write `{}`", path.display()))
}

/// Copy `source` to `dest`, creating parent directories as needed.
pub fn copy_output(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create `{}`", parent.display()))?;
    }
    fs::copy(source, dest).with_context(|| {
        format!(
            "failed to copy `{}` to `{}`",
            source.display(),
            dest.display()
        )
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_output_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c.txt");
        write_output(&path, "hi").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hi");
    }

    #[test]
    fn test_copy_output_creates_parents() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src.txt");
        fs::write(&src, "payload").unwrap();

        let dest = dir.path().join("nested/dest.txt");
        copy_output(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "payload");
    }
}
