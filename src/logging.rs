//! Logging initialisation.
//!
//! The crate only emits `tracing` events; the hosting application decides
//! whether to install this subscriber or its own.

use tracing_subscriber::{fmt, EnvFilter};

/// Install a fmt subscriber filtered by `RUST_LOG` (default: `info`).
///
/// ```no_run
/// gridworld_store::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Debug-level subscriber for tests. Safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(test_filter())
        .with_test_writer()
        .try_init();
}

fn test_filter() -> EnvFilter {
    EnvFilter::new("gridworld_store=debug")
}
