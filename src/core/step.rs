//! Pipeline step descriptors.
//!
//! Steps form a small directed acyclic graph: every step knows the steps
//! that must run before it, and `DEFAULT_SEQUENCE` fixes the canonical
//! total order used by the full build. `resolve_sequence` turns any
//! requested subset into a dependency-closed, canonically ordered run.

use clap::ValueEnum;
use std::fmt;

/// One named unit of the build pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum StepId {
    /// Delete the output directory tree
    Clean,
    /// Substitute the revision token and clean up HTML files
    Html,
    /// Minify CSS files with source maps
    Css,
    /// Minify the standalone widget script
    Widget,
    /// Concatenate and minify all other scripts into one bundle
    Scripts,
    /// Re-encode raster images and compact SVGs
    Images,
    /// Copy passthrough files to the output root
    Copy,
    /// Inline marked external resources into the target HTML file
    Inline,
}

/// Canonical full-build order. `resolve_sequence` sorts by position here.
pub const DEFAULT_SEQUENCE: [StepId; 8] = [
    StepId::Clean,
    StepId::Html,
    StepId::Css,
    StepId::Widget,
    StepId::Scripts,
    StepId::Images,
    StepId::Copy,
    StepId::Inline,
];

impl StepId {
    /// Step name as used in logs and on the CLI.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::Html => "html",
            Self::Css => "css",
            Self::Widget => "widget",
            Self::Scripts => "scripts",
            Self::Images => "images",
            Self::Copy => "copy",
            Self::Inline => "inline",
        }
    }

    /// Steps that must have run before this one in the same invocation.
    ///
    /// `inline` rewrites a file the `html` step emits, so running it
    /// standalone pulls `html` in first.
    pub const fn deps(self) -> &'static [StepId] {
        match self {
            Self::Inline => &[StepId::Html],
            _ => &[],
        }
    }

    /// Whether the step prepends the license header to its output.
    pub const fn needs_license(self) -> bool {
        matches!(self, Self::Widget | Self::Scripts)
    }

    /// Whether the step substitutes the resolved revision token.
    pub const fn needs_revision(self) -> bool {
        matches!(self, Self::Html)
    }

    /// Position in the canonical sequence.
    fn order(self) -> usize {
        DEFAULT_SEQUENCE
            .iter()
            .position(|s| *s == self)
            .unwrap_or(DEFAULT_SEQUENCE.len())
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Expand a requested step set with its dependency closure and order it
/// canonically. Duplicates are removed; the result is deterministic.
pub fn resolve_sequence(requested: &[StepId]) -> Vec<StepId> {
    let mut selected = Vec::new();
    let mut pending: Vec<StepId> = requested.to_vec();

    while let Some(step) = pending.pop() {
        if selected.contains(&step) {
            continue;
        }
        selected.push(step);
        pending.extend_from_slice(step.deps());
    }

    selected.sort_by_key(|s| s.order());
    selected
}
