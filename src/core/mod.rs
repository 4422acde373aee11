//! Core types - pure abstractions shared across the codebase.

mod context;
mod license;
mod state;
mod step;

pub use context::BuildContext;
pub use license::build_license_header;
pub use state::{is_shutdown, register_watch_session, setup_shutdown_handler};
pub use step::{DEFAULT_SEQUENCE, StepId, resolve_sequence};
