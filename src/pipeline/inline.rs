//! Inline-source post-processing.
//!
//! Rewrites the configured HTML file in place: every `<link>`/`<script>`
//! carrying an `inline` attribute is replaced by an inline `<style>`/
//! `<script>` element containing the referenced file. Inlined content is
//! intentionally not compressed.

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::config::PipelineConfig;
use crate::utils::path::rel_display;
use crate::{debug, log};

/// A whole `<link>` or `<script>` element (script includes its close tag).
static ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(link|script)\b([^>]*)>(?:\s*</script\s*>)?").expect("valid regex")
});

/// Standalone `inline` attribute inside an attribute list.
static INLINE_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s)inline(?:\s|=|/|$)").expect("valid regex"));

/// `src`/`href` attribute value.
static URL_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:src|href)\s*=\s*["']?([^"'\s>]+)["']?"#).expect("valid regex")
});

/// Inline marked resources into the configured target file.
///
/// An absent target is a silent no-op: the `html` step simply did not
/// emit it in this layout.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let target = config.inline_target();
    if !target.is_file() {
        debug!("inline"; "target `{}` not present", rel_display(&target, config.get_root()));
        return Ok(());
    }

    let html = fs::read_to_string(&target)
        .with_context(|| format!("failed to read `{}`", target.display()))?;
    let base = target.parent().unwrap_or(Path::new("."));

    let mut failure = None;
    let rewritten = ELEMENT_RE
        .replace_all(&html, |caps: &Captures| {
            match inline_element(caps, base) {
                Ok(replacement) => replacement,
                Err(e) => {
                    failure.get_or_insert(e);
                    caps[0].to_string()
                }
            }
        })
        .into_owned();
    if let Some(e) = failure {
        return Err(e);
    }

    fs::write(&target, rewritten)
        .with_context(|| format!("failed to write `{}`", target.display()))?;
    log!("inline"; "inlined resources into {}", rel_display(&target, config.get_root()));
    Ok(())
}

/// Replace one matched element, or return it unchanged when it is not
/// marked for inlining (or carries no resource reference).
fn inline_element(caps: &Captures<'_>, base: &Path) -> Result<String> {
    let attrs = &caps[2];
    if !INLINE_ATTR_RE.is_match(attrs) {
        return Ok(caps[0].to_string());
    }
    let Some(url) = URL_ATTR_RE.captures(attrs).map(|c| c[1].to_string()) else {
        return Ok(caps[0].to_string());
    };

    // Strip query/fragment cache-bust suffixes before hitting the disk
    let rel = url.split(['?', '#']).next().unwrap_or(&url);
    let path = base.join(rel);
    let content = fs::read_to_string(&path)
        .with_context(|| format!("failed to inline `{}`", path.display()))?;

    let tag = caps[1].to_ascii_lowercase();
    Ok(match tag.as_str() {
        "script" => format!("<script>{content}</script>"),
        _ => format!("<style>{content}</style>"),
    })
}
