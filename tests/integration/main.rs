//! Integration test modules.

mod adaptive_session_test;
mod pipeline_test;
mod progression_test;

/// Install a test subscriber once; `RUST_LOG` controls output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
