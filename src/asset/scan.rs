//! Asset scanning and classification (pure, no side effects).
//!
//! Source files are classified by extension and directory convention:
//!
//! ```text
//! src/
//! ├── widget.js            -> Widget (the configured entry, wherever it is)
//! ├── index.html           -> Html   (any .html in the tree)
//! ├── iframe/
//! │   ├── css/iframe.css   -> Css    (.css directly inside a css/ dir)
//! │   ├── js/app.js        -> Script (.js directly inside a js/ dir)
//! │   └── images/logo.png  -> Image  (known ext directly inside images/)
//! └── notes.txt            -> unclassified, ignored
//! ```

use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::config::PipelineConfig;

/// Extensions the image step accepts.
pub const IMAGE_EXTS: [&str; 5] = ["gif", "jpg", "jpeg", "png", "svg"];

const CSS_DIR: &str = "css";
const JS_DIR: &str = "js";
const IMAGES_DIR: &str = "images";

/// Asset category a source file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    Html,
    Css,
    Widget,
    Script,
    Image,
}

/// A source file paired with its output location.
#[derive(Debug, Clone)]
pub struct AssetRoute {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Classify a source file, or `None` when no step consumes it.
pub fn classify(path: &Path, config: &PipelineConfig) -> Option<AssetClass> {
    if path == config.widget_path() {
        return Some(AssetClass::Widget);
    }

    // Only files under the source tree are classified
    path.strip_prefix(config.source_dir()).ok()?;

    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let class = match ext.as_str() {
        "html" => AssetClass::Html,
        "css" if parent_is(path, CSS_DIR) => AssetClass::Css,
        "js" if parent_is(path, JS_DIR) => AssetClass::Script,
        e if IMAGE_EXTS.contains(&e) && parent_is(path, IMAGES_DIR) => AssetClass::Image,
        _ => return None,
    };
    Some(class)
}

/// Whether the file's immediate parent directory carries the given name.
fn parent_is(path: &Path, name: &str) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .is_some_and(|n| n == name)
}

/// Scan the source tree for all routes of one class, sorted by source
/// path for deterministic processing (the scripts step concatenates in
/// this order).
///
/// A missing or empty source tree yields an empty set - not an error.
pub fn scan(config: &PipelineConfig, class: AssetClass) -> Vec<AssetRoute> {
    let source_root = config.source_dir();
    let output_root = config.output_dir();

    if class == AssetClass::Widget {
        let source = config.widget_path();
        if !source.is_file() {
            return Vec::new();
        }
        // The widget lands at the output root under its own name
        let output = output_root.join(source.file_name().unwrap_or_default());
        return vec![AssetRoute { source, output }];
    }

    let mut routes: Vec<AssetRoute> = WalkDir::new(&source_root)
        .into_iter()
        .flatten()
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let source = entry.path();
            if classify(&source, config) != Some(class) {
                return None;
            }
            let rel = source.strip_prefix(&source_root).ok()?.to_path_buf();
            Some(AssetRoute {
                output: output_root.join(rel),
                source,
            })
        })
        .collect();

    routes.sort_by(|a, b| a.source.cmp(&b.source));
    routes
}
