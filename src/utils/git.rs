//! Git revision resolution.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::PipelineConfig;
use crate::debug;

/// Length of the short commit id embedded into HTML output.
const SHORT_REV_LEN: usize = 7;

/// Resolve the revision token for the current run.
///
/// Discovers the git repository containing the project root and shortens
/// its HEAD commit id. When discovery fails (exported tarball, CI without
/// history) the configured `[revision] fallback` is used; without one the
/// error propagates and the run aborts.
pub fn resolve_revision(config: &PipelineConfig) -> Result<String> {
    match short_head(config.get_root()) {
        Ok(rev) => Ok(rev),
        Err(e) => match &config.revision.fallback {
            Some(fallback) => {
                debug!("revision"; "{:#}, using fallback `{}`", e, fallback);
                Ok(fallback.clone())
            }
            None => Err(e).context(
                "failed to resolve build revision (set `[revision] fallback` for non-git builds)",
            ),
        },
    }
}

/// Short hex id of HEAD for the repository containing `root`.
fn short_head(root: &Path) -> Result<String> {
    let repo = gix::discover(root)
        .with_context(|| format!("no git repository found above `{}`", root.display()))?;
    let id = repo.head_id().context("repository HEAD has no commit")?;

    let mut hex = id.to_hex().to_string();
    hex.truncate(SHORT_REV_LEN);
    Ok(hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_fallback_outside_repository() {
        let (_dir, mut config) = test_config();
        config.revision.fallback = Some("0000000".into());
        assert_eq!(resolve_revision(&config).unwrap(), "0000000");
    }

    #[test]
    fn test_error_without_fallback() {
        let (_dir, config) = test_config();
        assert!(config.revision.fallback.is_none());
        assert!(resolve_revision(&config).is_err());
    }
}
