//! Source-tree scanning and minification.

pub mod minify;
pub mod scan;

pub use scan::{AssetClass, AssetRoute, classify, scan};
