//! HTML transformation: revision substitution, then cleanup.

use anyhow::{Context, Result};
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::sync::LazyLock;

use crate::asset::{AssetClass, scan};
use crate::config::PipelineConfig;
use crate::core::BuildContext;
use crate::log;
use crate::utils::html;
use crate::utils::path::rel_display;
use crate::utils::plural::plural_count;

/// Build-revision placeholder as emitted by the page templates.
static REVISION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*site\.github\.build_revision\s*\}\}").expect("valid regex")
});

/// Replace every revision placeholder and every literal cache-bust marker.
pub fn substitute_revision(source: &str, marker: &str, revision: &str) -> String {
    let substituted = REVISION_RE.replace_all(source, revision);
    if marker.is_empty() {
        return substituted.into_owned();
    }
    substituted.replace(marker, revision)
}

/// Transform all HTML files into the output tree.
pub fn run(config: &PipelineConfig, ctx: &BuildContext) -> Result<()> {
    let routes = scan(config, AssetClass::Html);

    routes.par_iter().try_for_each(|route| {
        let source = fs::read_to_string(&route.source).with_context(|| {
            format!("failed to read `{}`", rel_display(&route.source, config.get_root()))
        })?;

        // Substitution happens before cleanup, on the raw source
        let substituted =
            substitute_revision(&source, &config.revision.placeholder, &ctx.revision);
        crate::utils::fs::write_output(&route.output, html::clean(&substituted))
    })?;

    log!("html"; "processed {}", plural_count(routes.len(), "file"));
    Ok(())
}
