//! Output tree removal.

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;

use crate::config::PipelineConfig;
use crate::debug;
use crate::utils::path::rel_display;

/// Recursively delete the output directory. Absent output is not an error.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let output = config.output_dir();

    match fs::remove_dir_all(&output) {
        Ok(()) => {
            debug!("clean"; "removed {}", rel_display(&output, config.get_root()));
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => {
            Err(e).with_context(|| format!("failed to remove `{}`", output.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_clean_removes_populated_output() {
        let (dir, config) = test_config();
        let nested = dir.path().join("dist/iframe/js");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("main.min.js"), "x").unwrap();

        run(&config).unwrap();
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_clean_absent_output_is_ok() {
        let (dir, config) = test_config();
        assert!(!dir.path().join("dist").exists());
        run(&config).unwrap();
        // and twice in a row
        run(&config).unwrap();
    }
}
