//! Script transformation: widget minify and bundle concat+minify.
//!
//! Both steps prepend the license header, so the `@license` comment is
//! the very first content of every emitted script file; the source map
//! directive goes after the code.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::asset::minify::{self, MinifiedJs};
use crate::asset::{AssetClass, scan};
use crate::config::PipelineConfig;
use crate::utils::fs::write_output;
use crate::utils::path::rel_display;
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Minify the standalone widget entry into the output root.
pub fn run_widget(config: &PipelineConfig, ctx: &crate::core::BuildContext) -> Result<()> {
    let Some(route) = scan(config, AssetClass::Widget).into_iter().next() else {
        debug!("widget"; "entry `{}` not found", config.widget_path().display());
        return Ok(());
    };

    let filename = rel_display(&route.source, config.get_root());
    let source = fs::read_to_string(&route.source)
        .with_context(|| format!("failed to read `{filename}`"))?;

    let map_name = format!(
        "{}.map",
        route.output.file_name().unwrap_or_default().to_string_lossy()
    );
    let minified = minify::minify_js(&source, Some(Path::new(&map_name)))
        .with_context(|| format!("failed to minify `{filename}`"))?;

    emit(&route.output, &map_name, minified, &ctx.license_header)?;
    log!("widget"; "emitted {}", rel_display(&route.output, config.get_root()));
    Ok(())
}

/// Concatenate all non-widget scripts and minify them into one bundle.
pub fn run_bundle(config: &PipelineConfig, ctx: &crate::core::BuildContext) -> Result<()> {
    let routes = scan(config, AssetClass::Script);
    if routes.is_empty() {
        debug!("scripts"; "no script files matched");
        return Ok(());
    }

    // Concatenation order is the sorted scan order - deterministic
    let mut concatenated = String::new();
    for route in &routes {
        let source = fs::read_to_string(&route.source).with_context(|| {
            format!("failed to read `{}`", rel_display(&route.source, config.get_root()))
        })?;
        concatenated.push_str(&source);
        if !concatenated.ends_with('\n') {
            concatenated.push('\n');
        }
    }

    let bundle_name = min_js_name(&config.build.scripts.bundle);
    let output = config.bundle_dir().join(&bundle_name);
    let map_name = format!("{bundle_name}.map");

    let minified = minify::minify_js(&concatenated, Some(Path::new(&map_name)))
        .context("failed to minify script bundle")?;

    emit(&output, &map_name, minified, &ctx.license_header)?;
    log!(
        "scripts";
        "bundled {} into {}",
        plural_count(routes.len(), "file"),
        bundle_name
    );
    Ok(())
}

/// Assemble and write the final script: license, code, map directive.
fn emit(output: &Path, map_name: &str, minified: MinifiedJs, license: &str) -> Result<()> {
    let mut code = String::with_capacity(license.len() + minified.code.len() + 64);
    code.push_str(license);
    code.push_str(&minified.code);
    if !code.ends_with('\n') {
        code.push('\n');
    }
    if minified.map.is_some() {
        code.push_str(&format!("//# sourceMappingURL={map_name}\n"));
    }

    write_output(output, code)?;
    if let Some(map) = minified.map {
        write_output(&output.with_file_name(map_name), map)?;
    }
    Ok(())
}

/// `main.js` -> `main.min.js`
fn min_js_name(bundle: &str) -> String {
    match bundle.strip_suffix(".js") {
        Some(stem) => format!("{stem}.min.js"),
        None => format!("{bundle}.min.js"),
    }
}
