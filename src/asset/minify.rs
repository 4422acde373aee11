//! Asset minification for JS and CSS files.
//!
//! Uses oxc for JavaScript and lightningcss for CSS. Both wrappers can
//! emit a source map alongside the minified code; malformed input is a
//! hard error that aborts the owning step.

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use parcel_sourcemap::SourceMap;

/// Minified JavaScript plus its optional source map (JSON).
pub struct MinifiedJs {
    pub code: String,
    pub map: Option<String>,
}

/// Minified CSS plus its optional source map (JSON).
pub struct MinifiedCss {
    pub code: String,
    pub map: Option<String>,
}

/// Minify JavaScript source code.
///
/// When `map_path` is set, a source map referencing it is generated and
/// returned as JSON.
pub fn minify_js(source: &str, map_path: Option<&Path>) -> Result<MinifiedJs> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();

    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = ret.errors.first() {
        bail!("JS parse error: {error}");
    }

    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let minified = Minifier::new(options).minify(&allocator, &mut program);

    let ret = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            source_map_path: map_path.map(Path::to_path_buf),
            ..CodegenOptions::default()
        })
        .with_scoping(minified.scoping)
        .build(&program);

    Ok(MinifiedJs {
        code: ret.code,
        map: ret.map.map(|m| m.to_json_string()),
    })
}

/// Minify CSS source code.
///
/// `filename` labels the input in error messages and in the source map's
/// `sources` array.
pub fn minify_css(source: &str, filename: &str, with_map: bool) -> Result<MinifiedCss> {
    let stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| anyhow!("CSS parse error in `{filename}`: {e}"))?;

    let mut map = with_map.then(|| SourceMap::new("/"));
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            source_map: map.as_mut(),
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("CSS print error in `{filename}`: {e}"))?;

    let map_json = match map {
        Some(mut m) => Some(
            m.to_json(None)
                .map_err(|e| anyhow!("source map error for `{filename}`: {e}"))?,
        ),
        None => None,
    };

    Ok(MinifiedCss {
        code: result.code,
        map: map_json,
    })
}
