//! Change-event routing: map a changed path to the minimal affected steps.

use std::path::Path;

use crate::asset::{AssetClass, classify};
use crate::config::PipelineConfig;
use crate::core::StepId;
use crate::utils::path::normalize;

/// What a single changed path requires.
#[derive(Debug, PartialEq, Eq)]
pub enum ChangeScope {
    /// Re-run these steps (order is resolved later)
    Steps(Vec<StepId>),
    /// Reload `sitemill.toml` and run the full sequence
    ReloadConfig,
    /// Nothing to do
    Ignored,
}

/// Resolve the scope of one changed path.
pub fn scope_for(path: &Path, config: &PipelineConfig) -> ChangeScope {
    let path = normalize(path);

    if path == normalize(&config.config_path) {
        return ChangeScope::ReloadConfig;
    }
    // License feeds the header of both script outputs
    if path == normalize(&config.license_path()) {
        return ChangeScope::Steps(vec![StepId::Widget, StepId::Scripts]);
    }
    if config
        .build
        .passthrough
        .iter()
        .any(|p| normalize(&config.root_join(p)) == path)
    {
        return ChangeScope::Steps(vec![StepId::Copy]);
    }

    match classify(&path, config) {
        // An HTML edit invalidates the inlined file as well
        Some(AssetClass::Html) => ChangeScope::Steps(vec![StepId::Html, StepId::Inline]),
        Some(AssetClass::Css) => ChangeScope::Steps(vec![StepId::Css]),
        Some(AssetClass::Widget) => ChangeScope::Steps(vec![StepId::Widget]),
        Some(AssetClass::Script) => ChangeScope::Steps(vec![StepId::Scripts]),
        Some(AssetClass::Image) => ChangeScope::Steps(vec![StepId::Images]),
        None => ChangeScope::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn test_asset_classes_map_to_their_steps() {
        let (dir, config) = test_config();
        let src = dir.path().join("src");

        assert_eq!(
            scope_for(&src.join("page.html"), &config),
            ChangeScope::Steps(vec![StepId::Html, StepId::Inline])
        );
        assert_eq!(
            scope_for(&src.join("iframe/css/a.css"), &config),
            ChangeScope::Steps(vec![StepId::Css])
        );
        assert_eq!(
            scope_for(&src.join("widget.js"), &config),
            ChangeScope::Steps(vec![StepId::Widget])
        );
        assert_eq!(
            scope_for(&src.join("iframe/js/a.js"), &config),
            ChangeScope::Steps(vec![StepId::Scripts])
        );
        assert_eq!(
            scope_for(&src.join("iframe/images/a.png"), &config),
            ChangeScope::Steps(vec![StepId::Images])
        );
    }

    #[test]
    fn test_special_files() {
        let (dir, config) = test_config();

        assert_eq!(
            scope_for(&dir.path().join("sitemill.toml"), &config),
            ChangeScope::ReloadConfig
        );
        assert_eq!(
            scope_for(&dir.path().join("LICENSE"), &config),
            ChangeScope::Steps(vec![StepId::Widget, StepId::Scripts])
        );
        assert_eq!(
            scope_for(&dir.path().join("CNAME"), &config),
            ChangeScope::Steps(vec![StepId::Copy])
        );
    }

    #[test]
    fn test_unrelated_files_ignored() {
        let (dir, config) = test_config();
        assert_eq!(
            scope_for(&dir.path().join("src/notes.txt"), &config),
            ChangeScope::Ignored
        );
        assert_eq!(
            scope_for(&dir.path().join("README.md"), &config),
            ChangeScope::Ignored
        );
    }
}
