//! Schema definition helpers
//!
//! A small blueprint DSL for creating tables, in the spirit of schema
//! builders found in batteries-included web frameworks: name the columns,
//! mark the last one nullable if needed, and let the dialect render the DDL.
//!
//! ```rust,no_run
//! use grappelli_backends::{DatabaseConnection, Schema};
//!
//! # async fn example(db: &DatabaseConnection) -> grappelli_backends::Result<()> {
//! Schema::create(db, "posts", |table| {
//!     table.increments("id");
//!     table.string("title").nullable();
//!     table.unsigned_integer("user_id").nullable();
//!     table.timestamps();
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use sea_query::{Alias, ColumnDef, PostgresQueryBuilder, SqliteQueryBuilder, Table};

use crate::{
	connection::DatabaseConnection,
	error::Result,
	types::DatabaseType,
};

/// Column collection for one `CREATE TABLE` statement
pub struct TableBlueprint {
	table: String,
	columns: Vec<ColumnDef>,
}

/// Chainable modifier handle for the column that was just added
pub struct ColumnModifier<'a> {
	blueprint: &'a mut TableBlueprint,
}

impl ColumnModifier<'_> {
	/// Allow NULL values in the column
	pub fn nullable(self) -> Self {
		if let Some(column) = self.blueprint.columns.last_mut() {
			column.null();
		}
		self
	}
}

impl TableBlueprint {
	fn new(table: impl Into<String>) -> Self {
		Self {
			table: table.into(),
			columns: Vec::new(),
		}
	}

	fn push(&mut self, column: ColumnDef) -> ColumnModifier<'_> {
		self.columns.push(column);
		ColumnModifier { blueprint: self }
	}

	/// Auto-incrementing integer primary key
	pub fn increments(&mut self, name: &str) -> ColumnModifier<'_> {
		let mut column = ColumnDef::new(Alias::new(name));
		column
			.big_integer()
			.not_null()
			.auto_increment()
			.primary_key();
		self.push(column)
	}

	/// Variable-length text column
	pub fn string(&mut self, name: &str) -> ColumnModifier<'_> {
		let mut column = ColumnDef::new(Alias::new(name));
		column.string().not_null();
		self.push(column)
	}

	/// Signed integer column
	pub fn integer(&mut self, name: &str) -> ColumnModifier<'_> {
		let mut column = ColumnDef::new(Alias::new(name));
		column.big_integer().not_null();
		self.push(column)
	}

	/// Unsigned integer column (rendered as a wide signed integer where the
	/// dialect has no unsigned types)
	pub fn unsigned_integer(&mut self, name: &str) -> ColumnModifier<'_> {
		let mut column = ColumnDef::new(Alias::new(name));
		column.big_integer().not_null();
		self.push(column)
	}

	/// Boolean column
	pub fn boolean(&mut self, name: &str) -> ColumnModifier<'_> {
		let mut column = ColumnDef::new(Alias::new(name));
		column.boolean().not_null();
		self.push(column)
	}

	/// Nullable `created_at` / `updated_at` timestamp pair
	pub fn timestamps(&mut self) {
		for name in ["created_at", "updated_at"] {
			let mut column = ColumnDef::new(Alias::new(name));
			column.timestamp().null();
			self.columns.push(column);
		}
	}

	fn build(self, database_type: DatabaseType) -> String {
		let mut stmt = Table::create();
		stmt.table(Alias::new(&self.table)).if_not_exists();
		for column in self.columns {
			stmt.col(column);
		}
		match database_type {
			DatabaseType::Postgres => stmt.to_string(PostgresQueryBuilder),
			DatabaseType::Sqlite => stmt.to_string(SqliteQueryBuilder),
		}
	}
}

/// Schema-level DDL entry points
pub struct Schema;

impl Schema {
	/// Create a table from a blueprint closure
	pub async fn create<F>(db: &DatabaseConnection, table: &str, f: F) -> Result<()>
	where
		F: FnOnce(&mut TableBlueprint),
	{
		let mut blueprint = TableBlueprint::new(table);
		f(&mut blueprint);
		let sql = blueprint.build(db.database_type());
		tracing::debug!(sql = %sql, "creating table");
		db.execute(&sql, Vec::new()).await?;
		Ok(())
	}

	/// Drop a table if it exists
	pub async fn drop_if_exists(db: &DatabaseConnection, table: &str) -> Result<()> {
		let stmt = Table::drop().table(Alias::new(table)).if_exists().to_owned();
		let sql = match db.database_type() {
			DatabaseType::Postgres => stmt.to_string(PostgresQueryBuilder),
			DatabaseType::Sqlite => stmt.to_string(SqliteQueryBuilder),
		};
		tracing::debug!(sql = %sql, "dropping table");
		db.execute(&sql, Vec::new()).await?;
		Ok(())
	}
}
