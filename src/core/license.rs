//! License header construction.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Build the `@license` comment block from a LICENSE text file.
///
/// The file is read line-by-line in text mode; line order is preserved and
/// no whitespace normalization is applied. The result is:
///
/// ```text
/// /**
///  * @license
///  * <line 1>
///  * ...
///  */
/// ```
pub fn build_license_header(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("failed to read license file `{}`", path.display()))?;

    let mut header = String::from("/**\n * @license\n");
    for line in BufReader::new(file).lines() {
        let line = line
            .with_context(|| format!("failed to read license file `{}`", path.display()))?;
        header.push_str(" * ");
        header.push_str(&line);
        header.push('\n');
    }
    header.push_str(" */\n");

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_header_format_exact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LICENSE");
        fs::write(&path, "MIT License\n\nCopyright (c) 2018\n").unwrap();

        let header = build_license_header(&path).unwrap();
        assert_eq!(
            header,
            "/**\n * @license\n * MIT License\n * \n * Copyright (c) 2018\n */\n"
        );
    }

    #[test]
    fn test_header_preserves_line_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LICENSE");
        fs::write(&path, "first\nsecond\nthird").unwrap();

        let header = build_license_header(&path).unwrap();
        let first = header.find("first").unwrap();
        let second = header.find("second").unwrap();
        let third = header.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_header_empty_license() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("LICENSE");
        fs::write(&path, "").unwrap();

        let header = build_license_header(&path).unwrap();
        assert_eq!(header, "/**\n * @license\n */\n");
    }

    #[test]
    fn test_missing_license_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(build_license_header(&dir.path().join("LICENSE")).is_err());
    }
}
