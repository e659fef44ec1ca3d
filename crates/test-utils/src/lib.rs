//! Shared helpers for the `serverless-plugin` test suites.
//!
//! - [`builders`]: node properties and function descriptors around the
//!   `foobar`/`bar`/`baz`/`qux` fixture.
//! - [`fake_backend`]: a `CommandBackend` that records command lines instead
//!   of spawning `serverless` or `curl`.

pub mod builders;
pub mod fake_backend;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Route plugin logs (including relayed `<out>`/`<err>` lines) into the
/// test harness output.
///
/// Filter with `RUST_LOG`, e.g. `RUST_LOG=serverless_plugin=debug`; defaults
/// to `info`. Captured output shows up for failing tests only unless run
/// with `--nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Fail the test if a lifecycle operation has not finished within 5 seconds.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("operation did not finish within 5 seconds")
}
