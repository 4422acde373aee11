//! Sequential step runner.
//!
//! Steps execute strictly in order on the calling thread; the first
//! failure aborts the remaining sequence and propagates to `main`, which
//! exits non-zero. Files written before the failing step stay on disk -
//! there is no rollback and no retry.

mod clean;
mod copy;
mod css;
mod html;
mod images;
mod inline;
mod scripts;

use anyhow::{Context, Result};
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::core::{BuildContext, DEFAULT_SEQUENCE, StepId, resolve_sequence};
use crate::utils::plural::plural_count;
use crate::{debug, log};

/// Run the full default sequence.
pub fn run_default(config: &PipelineConfig) -> Result<()> {
    run(&DEFAULT_SEQUENCE, config)
}

/// Run a requested subset, dependency-closed and canonically ordered.
pub fn run_requested(requested: &[StepId], config: &PipelineConfig) -> Result<()> {
    let sequence = resolve_sequence(requested);
    run(&sequence, config)
}

/// Run a prepared sequence of steps.
pub fn run(steps: &[StepId], config: &PipelineConfig) -> Result<()> {
    let started = Instant::now();

    // Shared run context: resolved once, immutable afterwards
    let ctx = BuildContext::resolve(config, steps)?;

    for &step in steps {
        debug!(step.name(); "starting");
        execute(step, config, &ctx).with_context(|| format!("step `{step}` failed"))?;
    }

    log!(
        "build";
        "completed {} in {:.2?}",
        plural_count(steps.len(), "step"),
        started.elapsed()
    );
    Ok(())
}

fn execute(step: StepId, config: &PipelineConfig, ctx: &BuildContext) -> Result<()> {
    match step {
        StepId::Clean => clean::run(config),
        StepId::Html => html::run(config, ctx),
        StepId::Css => css::run(config),
        StepId::Widget => scripts::run_widget(config, ctx),
        StepId::Scripts => scripts::run_bundle(config, ctx),
        StepId::Images => images::run(config),
        StepId::Copy => copy::run(config),
        StepId::Inline => inline::run(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::fs;
    use std::path::Path;

    fn touch(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Populate a project resembling the stock layout.
    fn populate(root: &Path) {
        touch(&root.join("LICENSE"), "MIT License\n");
        touch(&root.join("CNAME"), "widget.example.com\n");
        touch(
            &root.join("src/index.html"),
            "<!-- header -->\n<p>rev {{ site.github.build_revision }}</p>\n<p>v=CACHE_BUST</p>\n",
        );
        touch(&root.join("src/widget.js"), "console.log('widget');\n");
        touch(
            &root.join("src/iframe/iframe.html"),
            "<link href=\"css/iframe.min.css\" inline>\n",
        );
        touch(&root.join("src/iframe/css/iframe.css"), ".a { color: #ffffff; }\n");
        touch(&root.join("src/iframe/js/app.js"), "console.log('app');\n");
        touch(&root.join("src/iframe/js/boot.js"), "console.log('boot');\n");
    }

    #[test]
    fn test_full_sequence_end_to_end() {
        let (dir, mut config) = test_config();
        config.revision.fallback = Some("abc1234".into());
        populate(dir.path());

        run(&DEFAULT_SEQUENCE, &config).unwrap();

        let dist = dir.path().join("dist");

        // html: tokens substituted, comment stripped
        let html = fs::read_to_string(dist.join("index.html")).unwrap();
        assert!(html.contains("rev abc1234"));
        assert!(html.contains("v=abc1234"));
        assert!(!html.contains("build_revision"));
        assert!(!html.contains("CACHE_BUST"));
        assert!(!html.contains("<!--"));

        // css: renamed with a source map
        let css = fs::read_to_string(dist.join("iframe/css/iframe.min.css")).unwrap();
        assert!(css.contains("#fff"));
        assert!(css.contains("sourceMappingURL=iframe.min.css.map"));
        assert!(dist.join("iframe/css/iframe.min.css.map").exists());

        // widget: license header first
        let widget = fs::read_to_string(dist.join("widget.js")).unwrap();
        assert!(widget.starts_with("/**\n * @license\n * MIT License\n */\n"));

        // scripts: bundle in the configured directory, license first
        let bundle = fs::read_to_string(dist.join("iframe/js/main.min.js")).unwrap();
        assert!(bundle.starts_with("/**\n * @license\n"));
        assert!(bundle.contains("boot"));
        assert!(dist.join("iframe/js/main.min.js.map").exists());

        // copy: passthrough at the output root
        assert_eq!(
            fs::read_to_string(dist.join("CNAME")).unwrap(),
            "widget.example.com\n"
        );

        // inline: the marked stylesheet was embedded in place
        let iframe = fs::read_to_string(dist.join("iframe/iframe.html")).unwrap();
        assert!(iframe.contains("<style>"));
        assert!(!iframe.contains("inline>"));
    }

    #[test]
    fn test_sequence_is_idempotent() {
        let (dir, mut config) = test_config();
        config.revision.fallback = Some("abc1234".into());
        populate(dir.path());

        run(&DEFAULT_SEQUENCE, &config).unwrap();
        let first = fs::read_to_string(dir.path().join("dist/iframe/js/main.min.js")).unwrap();
        let first_html = fs::read_to_string(dir.path().join("dist/index.html")).unwrap();

        run(&DEFAULT_SEQUENCE, &config).unwrap();
        let second = fs::read_to_string(dir.path().join("dist/iframe/js/main.min.js")).unwrap();
        let second_html = fs::read_to_string(dir.path().join("dist/index.html")).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_html, second_html);
    }

    #[test]
    fn test_failing_step_aborts_sequence() {
        let (dir, mut config) = test_config();
        config.revision.fallback = Some("abc1234".into());
        touch(&dir.path().join("LICENSE"), "MIT\n");
        touch(&dir.path().join("src/iframe/css/bad.css"), "not { css ");
        touch(&dir.path().join("src/iframe/images/x.gif"), "GIF89a");

        let err = run(&DEFAULT_SEQUENCE, &config).unwrap_err();
        assert!(err.to_string().contains("step `css` failed"));
        // images runs after css and must not have executed
        assert!(!dir.path().join("dist/iframe/images/x.gif").exists());
    }
}
