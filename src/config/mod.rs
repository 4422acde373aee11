//! Pipeline configuration management for `sitemill.toml`.
//!
//! # Sections
//!
//! | Section           | Purpose                                          |
//! |-------------------|--------------------------------------------------|
//! | `[build]`         | Source/output trees, passthrough file list       |
//! | `[build.widget]`  | Standalone widget script entry                   |
//! | `[build.scripts]` | Script bundle name and output directory          |
//! | `[build.inline]`  | Inline-source target file                        |
//! | `[license]`       | LICENSE file feeding the `@license` header       |
//! | `[revision]`      | Cache-bust marker and revision fallback          |
//! | `[watch]`         | Debounce and rebuild-cooldown windows            |
//!
//! Every section has serde defaults, so an empty (or absent) config file
//! describes the stock layout: `src/` in, `dist/` out, `src/widget.js`
//! widget, `iframe/js/main.min.js` bundle, `CNAME` passthrough.

mod error;
mod handle;
mod util;

pub use error::ConfigError;
pub use handle::{cfg, init_config, reload_config};

use crate::{cli::Cli, debug};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitemill.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    root: PathBuf,

    /// Build tree settings
    #[serde(default)]
    pub build: BuildConfig,

    /// License header settings
    #[serde(default)]
    pub license: LicenseConfig,

    /// Revision token settings
    #[serde(default)]
    pub revision: RevisionConfig,

    /// Watch mode settings
    #[serde(default)]
    pub watch: WatchConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cli: None,
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            build: BuildConfig::default(),
            license: LicenseConfig::default(),
            revision: RevisionConfig::default(),
            watch: WatchConfig::default(),
        }
    }
}

// ============================================================================
// sections
// ============================================================================

/// `[build]` - source/output trees and passthrough files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Source tree, relative to the project root
    pub source: PathBuf,
    /// Output tree, relative to the project root
    pub output: PathBuf,
    /// Files copied verbatim to the output root, relative to the project root
    pub passthrough: Vec<PathBuf>,
    /// Standalone widget script settings
    pub widget: WidgetConfig,
    /// Script bundle settings
    pub scripts: ScriptsConfig,
    /// Inline-source settings
    pub inline: InlineConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("src"),
            output: PathBuf::from("dist"),
            passthrough: vec![PathBuf::from("CNAME")],
            widget: WidgetConfig::default(),
            scripts: ScriptsConfig::default(),
            inline: InlineConfig::default(),
        }
    }
}

/// `[build.widget]` - the single script minified without bundling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WidgetConfig {
    /// Entry file, relative to the source tree
    pub entry: PathBuf,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            entry: PathBuf::from("widget.js"),
        }
    }
}

/// `[build.scripts]` - concatenated script bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptsConfig {
    /// Logical bundle name before the `.min.js` rename
    pub bundle: String,
    /// Bundle directory, relative to the output tree
    pub output_dir: PathBuf,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            bundle: String::from("main.js"),
            output_dir: PathBuf::from("iframe/js"),
        }
    }
}

/// `[build.inline]` - post-build resource inlining
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InlineConfig {
    /// HTML file rewritten in place, relative to the output tree
    pub target: PathBuf,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            target: PathBuf::from("iframe/iframe.html"),
        }
    }
}

/// `[license]` - source of the `@license` header
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LicenseConfig {
    /// License text file, relative to the project root
    pub file: PathBuf,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("LICENSE"),
        }
    }
}

/// `[revision]` - cache-bust substitution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevisionConfig {
    /// Literal marker replaced by the revision in HTML output
    pub placeholder: String,
    /// Revision used when no git repository is discoverable
    pub fallback: Option<String>,
}

impl Default for RevisionConfig {
    fn default() -> Self {
        Self {
            placeholder: String::from("CACHE_BUST"),
            fallback: None,
        }
    }
}

/// `[watch]` - event coalescing windows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Quiet period after the last event before a rebuild fires (ms)
    pub debounce_ms: u64,
    /// Minimum spacing between two rebuilds (ms)
    pub cooldown_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            cooldown_ms: 800,
        }
    }
}

// ============================================================================
// loading
// ============================================================================

impl PipelineConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; the project root is
    /// its parent directory. A missing config file is not an error - the
    /// defaults describe the stock layout and the root is cwd.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                config.config_path = path;
                config
            }
            None => {
                debug!("config"; "`{}` not found, using defaults", cli.config.display());
                let mut config = Self::default();
                config.root = std::env::current_dir()?;
                config.config_path = config.root.join(&cli.config);
                config
            }
        };

        config.cli = Some(cli);
        config.apply_cli_overrides(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse a config file from disk.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply CLI path overrides on top of the file values.
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(source) = &cli.source {
            self.build.source = source.clone();
        }
        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }
    }

    /// Reject layouts the pipeline cannot operate on safely.
    ///
    /// `clean` recursively deletes the output tree, so the output must
    /// never alias or contain the project root or the source tree.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let root = crate::utils::path::normalize(self.get_root());
        let source = crate::utils::path::normalize(&self.source_dir());
        let output = crate::utils::path::normalize(&self.output_dir());

        if output == root {
            return Err(ConfigError::Validation(
                "`build.output` must not be the project root".into(),
            ));
        }
        if output == source {
            return Err(ConfigError::Validation(
                "`build.output` must differ from `build.source`".into(),
            ));
        }
        if source.starts_with(&output) {
            return Err(ConfigError::Validation(
                "`build.source` must not live inside `build.output`".into(),
            ));
        }
        if output.starts_with(&source) {
            return Err(ConfigError::Validation(
                "`build.output` must not live inside `build.source`".into(),
            ));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // path accessors (stored paths stay relative; accessors join the root)
    // ------------------------------------------------------------------

    /// Project root directory.
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path onto the project root.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Absolute source tree.
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.build.source)
    }

    /// Absolute output tree.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.build.output)
    }

    /// Absolute widget entry path.
    pub fn widget_path(&self) -> PathBuf {
        self.source_dir().join(&self.build.widget.entry)
    }

    /// Absolute LICENSE path.
    pub fn license_path(&self) -> PathBuf {
        self.root.join(&self.license.file)
    }

    /// Absolute bundle directory inside the output tree.
    pub fn bundle_dir(&self) -> PathBuf {
        self.output_dir().join(&self.build.scripts.output_dir)
    }

    /// Absolute inline-source target inside the output tree.
    pub fn inline_target(&self) -> PathBuf {
        self.output_dir().join(&self.build.inline.target)
    }
}

// ============================================================================
// test fixtures
// ============================================================================

/// Build a default config rooted in a fresh temp directory, with the
/// stock `src/` tree created.
#[cfg(test)]
pub fn test_config() -> (tempfile::TempDir, PipelineConfig) {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let mut config = PipelineConfig::default();
    config.root = dir.path().to_path_buf();
    config.config_path = dir.path().join("sitemill.toml");
    fs::create_dir_all(config.source_dir()).expect("source dir");
    (dir, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_stock_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.build.source, PathBuf::from("src"));
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.widget.entry, PathBuf::from("widget.js"));
        assert_eq!(config.build.scripts.bundle, "main.js");
        assert_eq!(config.build.scripts.output_dir, PathBuf::from("iframe/js"));
        assert_eq!(config.build.inline.target, PathBuf::from("iframe/iframe.html"));
        assert_eq!(config.build.passthrough, vec![PathBuf::from("CNAME")]);
        assert_eq!(config.revision.placeholder, "CACHE_BUST");
        assert_eq!(config.watch.debounce_ms, 300);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: PipelineConfig = toml::from_str(
            r#"
            [build]
            source = "web"

            [revision]
            placeholder = "BUST_ME"
            fallback = "local"
            "#,
        )
        .unwrap();
        assert_eq!(config.build.source, PathBuf::from("web"));
        // Untouched sections keep their defaults
        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.revision.placeholder, "BUST_ME");
        assert_eq!(config.revision.fallback.as_deref(), Some("local"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let parsed: Result<PipelineConfig, _> = toml::from_str(
            r#"
            [build]
            sorce = "web"
            "#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_validate_rejects_output_aliasing_source() {
        let (_dir, mut config) = test_config();
        config.build.output = config.build.source.clone();
        assert!(config.validate().is_err());

        config.build.output = PathBuf::from("src/dist");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_stock_layout() {
        let (_dir, config) = test_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_path_accessors_join_root() {
        let (dir, config) = test_config();
        assert_eq!(config.source_dir(), dir.path().join("src"));
        assert_eq!(config.widget_path(), dir.path().join("src/widget.js"));
        assert_eq!(config.bundle_dir(), dir.path().join("dist/iframe/js"));
        assert_eq!(
            config.inline_target(),
            dir.path().join("dist/iframe/iframe.html")
        );
    }
}
