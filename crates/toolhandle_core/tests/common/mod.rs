//! Shared helpers for toolhandle_core integration tests.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a `tracing` subscriber once, filtered by `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}
