//! Database connection management

use std::sync::Arc;

use crate::{
	backend::DatabaseBackend,
	config::DatabaseConfig,
	error::Result,
	query_builder::InsertBuilder,
	types::{DatabaseType, QueryResult, QueryValue, Row},
};

#[cfg(feature = "postgres")]
use crate::dialect::postgres::PostgresBackend;

#[cfg(feature = "sqlite")]
use crate::dialect::sqlite::SqliteBackend;

/// Database connection wrapper
///
/// A cheaply clonable handle over an `Arc`'d backend; all query traffic and
/// builder entry points go through this type.
#[derive(Clone)]
pub struct DatabaseConnection {
	backend: Arc<dyn DatabaseBackend>,
}

impl DatabaseConnection {
	pub fn new(backend: Arc<dyn DatabaseBackend>) -> Self {
		Self { backend }
	}

	#[cfg(feature = "sqlite")]
	pub async fn connect_sqlite(url: &str) -> Result<Self> {
		use sqlx::SqlitePool;
		use sqlx::sqlite::SqlitePoolOptions;

		// Every pooled connection to an in-memory database opens its own
		// empty database, so such pools are capped to a single connection.
		let pool = if url.contains(":memory:") {
			SqlitePoolOptions::new()
				.max_connections(1)
				.connect(url)
				.await?
		} else {
			SqlitePool::connect(url).await?
		};
		Ok(Self {
			backend: Arc::new(SqliteBackend::new(pool)),
		})
	}

	#[cfg(feature = "sqlite")]
	pub fn from_sqlite_pool(pool: sqlx::SqlitePool) -> Self {
		Self {
			backend: Arc::new(SqliteBackend::new(pool)),
		}
	}

	#[cfg(feature = "postgres")]
	pub async fn connect_postgres(url: &str) -> Result<Self> {
		use sqlx::PgPool;
		let pool = PgPool::connect(url).await?;
		Ok(Self {
			backend: Arc::new(PostgresBackend::new(pool)),
		})
	}

	/// Connect according to a [`DatabaseConfig`]
	pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
		match config.engine {
			#[cfg(feature = "sqlite")]
			DatabaseType::Sqlite => Self::connect_sqlite(&config.url()).await,
			#[cfg(feature = "postgres")]
			DatabaseType::Postgres => Self::connect_postgres(&config.url()).await,
			#[allow(unreachable_patterns)]
			other => Err(crate::error::DatabaseError::UnsupportedOperation(format!(
				"backend {:?} is not enabled",
				other
			))),
		}
	}

	pub fn backend(&self) -> Arc<dyn DatabaseBackend> {
		self.backend.clone()
	}

	/// Get the database type
	pub fn database_type(&self) -> DatabaseType {
		self.backend.database_type()
	}

	/// Start an INSERT against the given table
	pub fn insert(&self, table: impl Into<String>) -> InsertBuilder {
		InsertBuilder::new(self.backend.clone(), table)
	}

	pub async fn execute(&self, sql: &str, params: Vec<QueryValue>) -> Result<QueryResult> {
		self.backend.execute(sql, params).await
	}

	pub async fn fetch_one(&self, sql: &str, params: Vec<QueryValue>) -> Result<Row> {
		self.backend.fetch_one(sql, params).await
	}

	pub async fn fetch_optional(&self, sql: &str, params: Vec<QueryValue>) -> Result<Option<Row>> {
		self.backend.fetch_optional(sql, params).await
	}

	pub async fn fetch_all(&self, sql: &str, params: Vec<QueryValue>) -> Result<Vec<Row>> {
		self.backend.fetch_all(sql, params).await
	}
}
