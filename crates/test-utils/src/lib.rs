//! Shared helpers for `xrdbatch` integration tests.

pub mod builders;
pub mod fake_runner;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Longest any single orchestrator test is allowed to run.
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

/// Install a test-captured tracing subscriber once per test binary.
///
/// The filter comes from `XRDBATCH_LOG`, then `RUST_LOG`, else `warn`.
/// Output only shows for failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let directives = std::env::var("XRDBATCH_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "warn".to_string());

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(directives))
            .with_test_writer()
            .with_target(false)
            .init();
    });
}

/// Await `fut`, panicking if it outlives [`TEST_DEADLINE`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_DEADLINE, fut).await {
        Ok(out) => out,
        Err(_) => panic!("test exceeded {TEST_DEADLINE:?}"),
    }
}
