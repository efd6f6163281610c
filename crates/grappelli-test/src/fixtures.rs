//! Database fixtures
//!
//! Every fixture hands out a fresh in-memory SQLite database, so tests are
//! isolated from each other without any rollback choreography.

use grappelli_backends::DatabaseConnection;
use rstest::*;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

/// A fresh in-memory SQLite pool
///
/// The pool is capped at a single connection: every pooled connection to
/// `sqlite::memory:` would otherwise open its own empty database.
#[fixture]
pub async fn sqlite_pool() -> SqlitePool {
	SqlitePoolOptions::new()
		.max_connections(1)
		.connect("sqlite::memory:")
		.await
		.expect("failed to open in-memory SQLite database")
}

/// A [`DatabaseConnection`] over a fresh in-memory SQLite database
///
/// # Examples
///
/// ```rust,ignore
/// #[rstest]
/// #[tokio::test]
/// async fn my_test(#[future] sqlite_connection: DatabaseConnection) {
///     let db = sqlite_connection.await;
///     // schema setup, inserts, assertions...
/// }
/// ```
#[fixture]
pub async fn sqlite_connection(#[future] sqlite_pool: SqlitePool) -> DatabaseConnection {
	DatabaseConnection::from_sqlite_pool(sqlite_pool.await)
}
