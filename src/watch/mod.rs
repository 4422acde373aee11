//! Watch mode: run the full sequence once, then rebuild affected steps on
//! file changes.
//!
//! Re-runs are strictly serialized on this thread: events firing mid-run
//! buffer in the notify channel and coalesce in the debouncer, and the
//! rebuild cooldown absorbs event storms. Two runs can never overlap.

mod debounce;
mod dispatch;

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;

use crate::config::{self, PipelineConfig};
use crate::core::{StepId, is_shutdown, register_watch_session, resolve_sequence};
use crate::logger::{status_error, status_success};
use crate::utils::path::rel_display;
use crate::{debug, log, pipeline};

use debounce::{ChangeKind, Debouncer};
use dispatch::ChangeScope;

/// Run watch mode until Ctrl+C.
pub fn run(config: &PipelineConfig) -> Result<()> {
    // Initial full build - a broken tree at startup is fatal, exactly
    // like a plain `sitemill build`
    pipeline::run_default(config)?;

    register_watch_session();

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = tx.send(res);
    })
    .context("failed to create filesystem watcher")?;

    attach_roots(&mut watcher, config)?;
    log!(
        "watch";
        "watching {} (Ctrl+C to stop)",
        rel_display(&config.source_dir(), config.get_root())
    );

    let mut debouncer = Debouncer::new(config.watch.debounce_ms, config.watch.cooldown_ms);
    let mut current = config::cfg();

    loop {
        if is_shutdown() {
            log!("watch"; "shutting down");
            return Ok(());
        }

        match rx.recv_timeout(debouncer.sleep_duration()) {
            Ok(Ok(event)) => debouncer.add_event(&event),
            Ok(Err(e)) => log!("watch"; "notify error: {}", e),
            Err(RecvTimeoutError::Timeout) => {
                if let Some(changes) = debouncer.take_if_ready() {
                    dispatch_batch(&changes, &mut current);
                }
            }
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

/// Watch the source tree recursively plus the standalone project files.
fn attach_roots(watcher: &mut impl Watcher, config: &PipelineConfig) -> Result<()> {
    let source = config.source_dir();
    if source.is_dir() {
        watcher
            .watch(&source, RecursiveMode::Recursive)
            .with_context(|| format!("failed to watch `{}`", source.display()))?;
    }

    let mut files = vec![config.config_path.clone(), config.license_path()];
    files.extend(config.build.passthrough.iter().map(|p| config.root_join(p)));
    for file in files {
        if file.is_file()
            && let Err(e) = watcher.watch(&file, RecursiveMode::NonRecursive)
        {
            debug!("watch"; "cannot watch `{}`: {}", file.display(), e);
        }
    }
    Ok(())
}

/// Map a coalesced change batch to steps and run them.
fn dispatch_batch(changes: &FxHashMap<PathBuf, ChangeKind>, current: &mut Arc<PipelineConfig>) {
    let mut reload = false;
    let mut affected: Vec<StepId> = Vec::new();

    for (path, kind) in changes {
        debug!("watch"; "{} {}", kind.label(), path.display());
        match dispatch::scope_for(path, current) {
            ChangeScope::ReloadConfig => reload = true,
            ChangeScope::Steps(steps) => affected.extend(steps),
            ChangeScope::Ignored => {}
        }
    }

    if reload {
        match config::reload_config() {
            Ok(true) => {
                *current = config::cfg();
                log!("watch"; "config reloaded (restart watch to track renamed paths)");
                run_steps(&crate::core::DEFAULT_SEQUENCE, current);
                return;
            }
            Ok(false) => {}
            Err(e) => {
                status_error("config reload failed", &format!("{e:#}"));
                return;
            }
        }
    }

    if affected.is_empty() {
        return;
    }
    let sequence = resolve_sequence(&affected);
    run_steps(&sequence, current);
}

/// Run one serialized re-run; failures are reported, watching continues.
fn run_steps(steps: &[StepId], config: &PipelineConfig) {
    match pipeline::run(steps, config) {
        Ok(()) => {
            let names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
            status_success(&format!("rebuilt: {}", names.join(", ")));
        }
        Err(e) => status_error("rebuild failed", &format!("{e:#}")),
    }
}
