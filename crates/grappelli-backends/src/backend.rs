//! Database backend abstraction

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{DatabaseType, QueryResult, QueryValue, Row};

/// A single SQL dialect plus its executor
///
/// Implementations wrap a driver connection pool and translate between
/// [`QueryValue`] parameters and the driver's native binding, and between
/// driver rows and [`Row`]. Statements arrive fully rendered for the
/// implementation's dialect; backends never rewrite SQL.
#[async_trait]
pub trait DatabaseBackend: Send + Sync {
	/// The dialect this backend renders and executes
	fn database_type(&self) -> DatabaseType;

	/// Positional parameter placeholder for this dialect (1-based index)
	fn placeholder(&self, index: usize) -> String;

	/// Whether INSERT ... RETURNING is available
	fn supports_returning(&self) -> bool;

	/// Execute a statement that returns no rows
	async fn execute(&self, sql: &str, params: Vec<QueryValue>) -> Result<QueryResult>;

	/// Fetch exactly one row; errors if the result set is empty
	async fn fetch_one(&self, sql: &str, params: Vec<QueryValue>) -> Result<Row>;

	/// Fetch zero or one row
	async fn fetch_optional(&self, sql: &str, params: Vec<QueryValue>) -> Result<Option<Row>>;

	/// Fetch all rows
	async fn fetch_all(&self, sql: &str, params: Vec<QueryValue>) -> Result<Vec<Row>>;
}
