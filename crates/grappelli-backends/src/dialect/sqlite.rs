//! SQLite dialect implementation

use async_trait::async_trait;
use sqlx::{Column, Row as SqlxRow, SqlitePool, TypeInfo, sqlite::SqliteRow};
use std::sync::Arc;

use crate::{
	backend::DatabaseBackend,
	error::Result,
	types::{DatabaseType, QueryResult, QueryValue, Row},
};

/// SQLite database backend
pub struct SqliteBackend {
	pool: Arc<SqlitePool>,
}

impl SqliteBackend {
	pub fn new(pool: SqlitePool) -> Self {
		Self {
			pool: Arc::new(pool),
		}
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	fn bind_value<'q>(
		query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
		value: &'q QueryValue,
	) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
		match value {
			QueryValue::Null => query.bind(None::<i32>),
			QueryValue::Bool(b) => query.bind(b),
			QueryValue::Int(i) => query.bind(i),
			QueryValue::Float(f) => query.bind(f),
			QueryValue::String(s) => query.bind(s),
			QueryValue::Bytes(b) => query.bind(b),
			QueryValue::Timestamp(dt) => query.bind(dt),
		}
	}

	fn convert_row(sqlite_row: SqliteRow) -> Result<Row> {
		let mut row = Row::new();
		for column in sqlite_row.columns() {
			let column_name = column.name();
			let type_name = column.type_info().name().to_uppercase();
			row.insert(
				column_name.to_string(),
				Self::decode_cell(&sqlite_row, column_name, &type_name),
			);
		}
		Ok(row)
	}

	fn decode_cell(sqlite_row: &SqliteRow, column_name: &str, type_name: &str) -> QueryValue {
		// NULL must be detected through Option probes before any typed read:
		// try_get::<i64> on a NULL cell in a RETURNING result reports 0
		// instead of failing, which would mistype the value.
		let is_null = sqlite_row
			.try_get::<Option<String>, _>(column_name)
			.ok()
			.flatten()
			.is_none() && sqlite_row
			.try_get::<Option<i64>, _>(column_name)
			.ok()
			.flatten()
			.is_none() && sqlite_row
			.try_get::<Option<f64>, _>(column_name)
			.ok()
			.flatten()
			.is_none() && sqlite_row
			.try_get::<Option<Vec<u8>>, _>(column_name)
			.ok()
			.flatten()
			.is_none();
		if is_null {
			return QueryValue::Null;
		}

		// SQLite stores booleans as 0/1 integers; the declared column type
		// is the only way to tell them apart from real integers.
		if type_name.contains("BOOL") {
			if let Ok(value) = sqlite_row.try_get::<i64, _>(column_name) {
				return QueryValue::Bool(value != 0);
			}
			if let Ok(value) = sqlite_row.try_get::<bool, _>(column_name) {
				return QueryValue::Bool(value);
			}
			return QueryValue::Null;
		}

		if let Ok(value) = sqlite_row.try_get::<i64, _>(column_name) {
			QueryValue::Int(value)
		} else if let Ok(value) = sqlite_row.try_get::<f64, _>(column_name) {
			QueryValue::Float(value)
		} else if let Ok(value) = sqlite_row.try_get::<String, _>(column_name) {
			QueryValue::String(value)
		} else if let Ok(value) = sqlite_row.try_get::<Vec<u8>, _>(column_name) {
			QueryValue::Bytes(value)
		} else if let Ok(value) = sqlite_row.try_get::<chrono::DateTime<chrono::Utc>, _>(column_name)
		{
			QueryValue::Timestamp(value)
		} else if let Ok(value) = sqlite_row.try_get::<chrono::NaiveDateTime, _>(column_name) {
			QueryValue::Timestamp(chrono::DateTime::from_naive_utc_and_offset(
				value,
				chrono::Utc,
			))
		} else {
			tracing::warn!(column = column_name, "undecodable SQLite value, treating as NULL");
			QueryValue::Null
		}
	}
}

#[async_trait]
impl DatabaseBackend for SqliteBackend {
	fn database_type(&self) -> DatabaseType {
		DatabaseType::Sqlite
	}

	fn placeholder(&self, _index: usize) -> String {
		"?".to_string()
	}

	fn supports_returning(&self) -> bool {
		true
	}

	async fn execute(&self, sql: &str, params: Vec<QueryValue>) -> Result<QueryResult> {
		let mut query = sqlx::query(sql);
		for param in &params {
			query = Self::bind_value(query, param);
		}
		let result = query.execute(self.pool.as_ref()).await?;
		Ok(QueryResult {
			rows_affected: result.rows_affected(),
		})
	}

	async fn fetch_one(&self, sql: &str, params: Vec<QueryValue>) -> Result<Row> {
		let mut query = sqlx::query(sql);
		for param in &params {
			query = Self::bind_value(query, param);
		}
		let row = query.fetch_one(self.pool.as_ref()).await?;
		Self::convert_row(row)
	}

	async fn fetch_optional(&self, sql: &str, params: Vec<QueryValue>) -> Result<Option<Row>> {
		let mut query = sqlx::query(sql);
		for param in &params {
			query = Self::bind_value(query, param);
		}
		let row = query.fetch_optional(self.pool.as_ref()).await?;
		row.map(Self::convert_row).transpose()
	}

	async fn fetch_all(&self, sql: &str, params: Vec<QueryValue>) -> Result<Vec<Row>> {
		let mut query = sqlx::query(sql);
		for param in &params {
			query = Self::bind_value(query, param);
		}
		let rows = query.fetch_all(self.pool.as_ref()).await?;
		rows.into_iter().map(Self::convert_row).collect()
	}
}
