//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Install a process-wide fmt subscriber, filtered by `RUST_LOG`
/// (default `info`).
///
/// Safe to call multiple times; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
