//! Error types for the ORM layer

use grappelli_backends::DatabaseError;
use grappelli_pagination::PaginationError;

/// Errors that can occur while building or executing queries
#[derive(Debug, thiserror::Error)]
pub enum OrmError {
	/// Database error
	#[error("Database error: {0}")]
	Database(#[from] DatabaseError),

	/// Failed to serialize or deserialize a model
	#[error("Failed to (de)serialize model: {0}")]
	Deserialization(#[from] serde_json::Error),

	/// No result found (for `.get()`)
	#[error("No result found")]
	NoResultFound,

	/// Multiple results found where exactly one was expected
	#[error("Multiple results found (expected 1, got {0})")]
	MultipleResultsFound(usize),

	/// The model instance has no primary key where one is required
	#[error("Model has no primary key set")]
	MissingPrimaryKey,

	/// Query building error
	#[error("Query building error: {0}")]
	QueryBuild(String),

	/// Pagination error
	#[error("Pagination error: {0}")]
	Pagination(#[from] PaginationError),
}

pub type Result<T> = std::result::Result<T, OrmError>;
