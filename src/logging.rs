//! Process-level tracing setup for hosts embedding the runtime.

use tracing_subscriber::EnvFilter;

/// Install a formatted subscriber honoring `RUST_LOG`, defaulting to info
/// for this crate. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rankpilot_runtime=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
