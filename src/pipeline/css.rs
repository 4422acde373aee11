//! CSS transformation: minify with source maps, rename to `.min.css`.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::asset::{AssetClass, AssetRoute, minify, scan};
use crate::config::PipelineConfig;
use crate::log;
use crate::utils::fs::write_output;
use crate::utils::path::rel_display;
use crate::utils::plural::plural_count;

/// Minify all CSS files into the output tree.
pub fn run(config: &PipelineConfig) -> Result<()> {
    let routes = scan(config, AssetClass::Css);

    routes
        .par_iter()
        .try_for_each(|route| process(route, config))?;

    log!("css"; "minified {}", plural_count(routes.len(), "file"));
    Ok(())
}

fn process(route: &AssetRoute, config: &PipelineConfig) -> Result<()> {
    let filename = rel_display(&route.source, config.get_root());
    let source = fs::read_to_string(&route.source)
        .with_context(|| format!("failed to read `{filename}`"))?;

    let minified = minify::minify_css(&source, &filename, true)?;

    let output = min_css_path(&route.output);
    let map_name = format!(
        "{}.map",
        output
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
    );

    let mut code = minified.code;
    if let Some(map) = minified.map {
        code.push_str(&format!("\n/*# sourceMappingURL={map_name} */\n"));
        write_output(&output.with_file_name(&map_name), map)?;
    }
    write_output(&output, code)
}

/// `style.css` -> `style.min.css`
fn min_css_path(path: &Path) -> PathBuf {
    path.with_extension("min.css")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_min_css_path() {
        assert_eq!(
            min_css_path(Path::new("dist/a/style.css")),
            PathBuf::from("dist/a/style.min.css")
        );
    }

    #[test]
    fn test_emits_minified_file_and_map() {
        let (dir, config) = test_config();
        let css = dir.path().join("src/iframe/css");
        fs::create_dir_all(&css).unwrap();
        fs::write(css.join("app.css"), ".a {\n  color: #ffffff;\n}\n").unwrap();

        run(&config).unwrap();

        let out = dir.path().join("dist/iframe/css/app.min.css");
        let content = fs::read_to_string(&out).unwrap();
        assert!(content.contains("#fff"));
        assert!(content.trim_end().ends_with("/*# sourceMappingURL=app.min.css.map */"));
        assert!(out.with_file_name("app.min.css.map").exists());
    }

    #[test]
    fn test_malformed_css_aborts() {
        let (dir, config) = test_config();
        let css = dir.path().join("src/css");
        fs::create_dir_all(&css).unwrap();
        fs::write(css.join("bad.css"), "broken {").unwrap();
        fs::write(css.join("bad2.css"), "x { color }").unwrap();

        assert!(run(&config).is_err());
    }

    #[test]
    fn test_no_matches_is_silent() {
        let (_dir, config) = test_config();
        run(&config).unwrap();
    }
}
