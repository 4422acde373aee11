//! Per-run build context.

use anyhow::Result;

use crate::config::PipelineConfig;
use crate::core::StepId;
use crate::utils::git::resolve_revision;

use super::build_license_header;

/// Immutable values shared by all steps of one run.
///
/// Constructed once before the first step executes and passed by reference
/// into every step. Components are only resolved when some step in the run
/// actually needs them, so `sitemill run images` works outside a git
/// checkout and without a LICENSE file.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    /// `@license` comment block prepended to emitted script bundles.
    pub license_header: String,
    /// Short identifier of the current source revision (cache busting).
    pub revision: String,
}

impl BuildContext {
    /// Resolve the context for a run consisting of `steps`.
    pub fn resolve(config: &PipelineConfig, steps: &[StepId]) -> Result<Self> {
        let license_header = if steps.iter().any(|s| s.needs_license()) {
            build_license_header(&config.license_path())?
        } else {
            String::new()
        };

        let revision = if steps.iter().any(|s| s.needs_revision()) {
            resolve_revision(config)?
        } else {
            String::new()
        };

        Ok(Self {
            license_header,
            revision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::fs;

    #[test]
    fn test_resolve_skips_unneeded_components() {
        let (_dir, config) = test_config();
        // No LICENSE file, no git repo: steps that need neither still resolve.
        let ctx = BuildContext::resolve(&config, &[StepId::Clean, StepId::Images]).unwrap();
        assert!(ctx.license_header.is_empty());
        assert!(ctx.revision.is_empty());
    }

    #[test]
    fn test_resolve_license_for_script_steps() {
        let (dir, config) = test_config();
        fs::write(dir.path().join("LICENSE"), "MIT\n").unwrap();

        let ctx = BuildContext::resolve(&config, &[StepId::Widget]).unwrap();
        assert_eq!(ctx.license_header, "/**\n * @license\n * MIT\n */\n");
    }

    #[test]
    fn test_resolve_revision_fallback() {
        let (_dir, mut config) = test_config();
        config.revision.fallback = Some("deadbee".into());

        let ctx = BuildContext::resolve(&config, &[StepId::Html]).unwrap();
        assert_eq!(ctx.revision, "deadbee");
    }
}
