//! Process state tracking.
//!
//! Two orthogonal flags:
//! - `SHUTDOWN`: Ctrl+C received
//! - `WATCHING`: a watch session owns the process (exit must be graceful)

use std::sync::atomic::{AtomicBool, Ordering};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// A watch loop is running and will poll `is_shutdown`
static WATCHING: AtomicBool = AtomicBool::new(false);

/// Setup the global Ctrl+C handler. Call once at program start
///
/// Outside a watch session a plain build is interrupted immediately.
/// Inside one, the flag is set and the watch loop drains on its next tick.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        SHUTDOWN.store(true, Ordering::SeqCst);

        if !WATCHING.load(Ordering::SeqCst) {
            std::process::exit(130);
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Mark the process as owned by a watch session.
pub fn register_watch_session() {
    WATCHING.store(true, Ordering::SeqCst);
}

/// Check if shutdown has been requested
///
/// Uses Relaxed ordering for performance - worst case is processing
/// a few more events before stopping, which is acceptable
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
