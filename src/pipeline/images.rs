//! Image optimization.
//!
//! Raster formats are decoded and re-encoded (strips metadata), SVG is
//! re-serialized compactly. Format and extension never change; gif is
//! copied through untouched.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;

use crate::asset::{AssetClass, AssetRoute, scan};
use crate::config::PipelineConfig;
use crate::log;
use crate::utils::fs::{copy_output, write_output};
use crate::utils::path::rel_display;
use crate::utils::plural::plural_count;

/// Optimize all images into the output tree.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let routes = scan(config, AssetClass::Image);

    routes.par_iter().try_for_each(|route| {
        process(route).with_context(|| {
            format!("failed to optimize `{}`", rel_display(&route.source, config.get_root()))
        })
    })?;

    log!("images"; "optimized {}", plural_count(routes.len(), "file"));
    Ok(())
}

fn process(route: &AssetRoute) -> Result<()> {
    let ext = route
        .source
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "png" | "jpg" | "jpeg" => reencode(route),
        "svg" => compact_svg(route),
        // gif: no lossless recompression backend, pass through
        _ => copy_output(&route.source, &route.output),
    }
}

/// Decode and re-encode a raster image under its original extension.
fn reencode(route: &AssetRoute) -> Result<()> {
    if let Some(parent) = route.output.parent() {
        fs::create_dir_all(parent)?;
    }
    let img = image::open(&route.source)?;
    img.save(&route.output)?;
    Ok(())
}

/// Re-serialize an SVG without indentation.
fn compact_svg(route: &AssetRoute) -> Result<()> {
    let data = fs::read(&route.source)?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())
        .context("failed to parse SVG")?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };
    write_output(&route.output, tree.to_string(&write_options))
}
