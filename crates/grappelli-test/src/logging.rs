//! Test logging utilities
//!
//! Provides one-shot tracing initialization for test binaries.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests (call as often as you like)
///
/// Installs a `tracing` subscriber honoring `RUST_LOG`, exactly once per
/// process; later calls are no-ops. Rendered SQL shows up at debug level.
///
/// # Examples
///
/// ```
/// use grappelli_test::logging::init_test_logging;
///
/// init_test_logging();
/// // test code
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_test_writer()
			.try_init();
	});
}
