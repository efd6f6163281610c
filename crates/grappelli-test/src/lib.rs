//! # Grappelli Test Utilities
//!
//! Fixtures and helpers for testing Grappelli-based code: in-memory SQLite
//! connections wired for `rstest`, and one-shot logging initialization.

pub mod fixtures;
pub mod logging;

pub use fixtures::{sqlite_connection, sqlite_pool};
pub use logging::init_test_logging;
