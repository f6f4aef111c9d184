//! Tracing setup for test binaries.
//!
//! The registry emits `debug` events for lifecycle changes and redefinitions
//! and `trace` events for cache hits and misses. Set `TEST_VARS_LOG` to an
//! env-filter directive (e.g. `test_vars=trace`) to see them.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "TEST_VARS_LOG";

const DEFAULT_FILTER: &str = "warn";

static INIT: OnceCell<()> = OnceCell::new();

/// Installs a fmt subscriber that writes through the test harness capture.
///
/// Safe to call from every test; only the first call does anything, and an
/// already-installed global subscriber is left in place.
pub fn init_tracing() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
