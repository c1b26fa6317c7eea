//! Integration tests for Layer 2: Engine
//!
//! Tests for weights, movement gating, land search, and destruction.

mod destruction;
mod weights;

/// Routes `tracing` output through the test harness; honours `RUST_LOG`.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
