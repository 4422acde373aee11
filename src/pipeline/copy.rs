//! Passthrough file copies.

use anyhow::Result;

use crate::config::PipelineConfig;
use crate::utils::fs::copy_output;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Copy the configured passthrough files verbatim to the output root.
///
/// Missing entries are skipped silently, matching the empty-match
/// semantics of the other steps.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let output_root = config.output_dir();
    let mut copied = 0usize;

    for rel in &config.build.passthrough {
        let source = config.root_join(rel);
        if !source.is_file() {
            debug!("copy"; "skipping missing `{}`", rel.display());
            continue;
        }
        let dest = output_root.join(source.file_name().unwrap_or_default());
        copy_output(&source, &dest)?;
        copied += 1;
    }

    log!("copy"; "copied {}", plural_count(copied, "passthrough file"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::fs;

    #[test]
    fn test_copies_to_output_root() {
        let (dir, config) = test_config();
        fs::write(dir.path().join("CNAME"), "example.com\n").unwrap();

        run(&config).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("dist/CNAME")).unwrap(),
            "example.com\n"
        );
    }

    #[test]
    fn test_missing_passthrough_skipped() {
        let (dir, config) = test_config();
        run(&config).unwrap();
        assert!(!dir.path().join("dist/CNAME").exists());
    }
}
