//! Insert building with dialect support
//!
//! High-level INSERT construction on top of SeaQuery. Identifiers are quoted
//! per dialect (double quotes on PostgreSQL/SQLite) and every value is bound
//! as a positional parameter, never interpolated into the SQL text.

use std::sync::Arc;

use sea_query::{Alias, Expr, PostgresQueryBuilder, Query, SqliteQueryBuilder, Value};

use crate::{
	backend::DatabaseBackend,
	error::Result,
	types::{DatabaseType, QueryResult, QueryValue, Row},
};

/// Convert a QueryValue into a SeaQuery Value for statement building
pub(crate) fn query_value_to_sea_value(qv: &QueryValue) -> Value {
	match qv {
		// BigInt(None) stands in for untyped NULL across both dialects
		QueryValue::Null => Value::BigInt(None),
		QueryValue::Bool(b) => Value::Bool(Some(*b)),
		QueryValue::Int(i) => Value::BigInt(Some(*i)),
		QueryValue::Float(f) => Value::Double(Some(*f)),
		QueryValue::String(s) => Value::String(Some(s.clone().into())),
		QueryValue::Bytes(b) => Value::Bytes(Some(b.clone().into())),
		QueryValue::Timestamp(dt) => Value::ChronoDateTimeUtc(Some((*dt).into())),
	}
}

/// INSERT query builder
pub struct InsertBuilder {
	backend: Arc<dyn DatabaseBackend>,
	table: String,
	columns: Vec<String>,
	values: Vec<QueryValue>,
	returning_all: bool,
}

impl InsertBuilder {
	pub fn new(backend: Arc<dyn DatabaseBackend>, table: impl Into<String>) -> Self {
		Self {
			backend,
			table: table.into(),
			columns: Vec::new(),
			values: Vec::new(),
			returning_all: false,
		}
	}

	/// Add a column/value pair
	pub fn value(mut self, column: impl Into<String>, value: impl Into<QueryValue>) -> Self {
		self.columns.push(column.into());
		self.values.push(value.into());
		self
	}

	/// Request `RETURNING *` when the backend supports it
	pub fn returning_all(mut self) -> Self {
		if self.backend.supports_returning() {
			self.returning_all = true;
		}
		self
	}

	pub fn build(&self) -> (String, Vec<QueryValue>) {
		let mut stmt = Query::insert()
			.into_table(Alias::new(&self.table))
			.to_owned();

		let column_refs: Vec<Alias> = self.columns.iter().map(Alias::new).collect();
		stmt.columns(column_refs);

		if !self.values.is_empty() {
			let sea_values: Vec<Expr> = self
				.values
				.iter()
				.map(|v| Expr::val(query_value_to_sea_value(v)))
				.collect();
			stmt.values(sea_values).unwrap();
		}

		if self.returning_all {
			stmt.returning_all();
		}

		let (sql, _) = match self.backend.database_type() {
			DatabaseType::Postgres => stmt.build(PostgresQueryBuilder),
			DatabaseType::Sqlite => stmt.build(SqliteQueryBuilder),
		};

		(sql, self.values.clone())
	}

	pub async fn execute(&self) -> Result<QueryResult> {
		let (sql, params) = self.build();
		tracing::debug!(sql = %sql, "executing INSERT");
		self.backend.execute(&sql, params).await
	}

	pub async fn fetch_one(&self) -> Result<Row> {
		let (sql, params) = self.build();
		tracing::debug!(sql = %sql, "executing INSERT ... RETURNING");
		self.backend.fetch_one(&sql, params).await
	}
}
