//! Error types for the backends layer

/// Errors surfaced by database backends and connections
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
	/// Connection establishment or configuration failure
	#[error("Connection error: {0}")]
	Connection(String),

	/// Error from the underlying driver
	#[error("Query error: {0}")]
	Query(#[from] sqlx::Error),

	/// A requested column is absent from the result row
	#[error("Column not found: {0}")]
	ColumnNotFound(String),

	/// A value could not be converted to the requested type
	#[error("Type error: {0}")]
	TypeError(String),

	/// The active backend does not support the requested operation
	#[error("Unsupported operation: {0}")]
	UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
