//! Model managers
//!
//! The manager is the entry point `Model::objects()` hands out: it creates
//! rows and opens query sets. It owns no state of its own; everything runs
//! against the connection passed to each call.

use std::marker::PhantomData;

use grappelli_backends::DatabaseConnection;

use crate::error::{OrmError, Result};
use crate::execution::{json_to_query_value, row_to_json};
use crate::model::Model;
use crate::query::{FilterOperator, FilterValue, QuerySet};

/// Manager for one model type
pub struct Manager<M: Model> {
	_marker: PhantomData<M>,
}

impl<M: Model> Manager<M> {
	pub fn new() -> Self {
		Self {
			_marker: PhantomData,
		}
	}

	/// Query set over all rows
	pub fn all(&self) -> QuerySet<M> {
		QuerySet::new()
	}

	/// Query set filtered by one condition
	pub fn filter(
		&self,
		field: impl Into<String>,
		operator: FilterOperator,
		value: FilterValue,
	) -> QuerySet<M> {
		QuerySet::new().filter(field, operator, value)
	}

	/// Insert a model instance and return the stored row as a model
	///
	/// A `None` primary key is left out of the INSERT so the database
	/// assigns it; every other field travels as a bound parameter. The
	/// returned instance is hydrated from the row the database stored
	/// (`RETURNING *`), so it carries the assigned key.
	pub async fn create(&self, db: &DatabaseConnection, model: &M) -> Result<M> {
		let json = serde_json::to_value(model)?;
		let fields = json.as_object().ok_or_else(|| {
			OrmError::QueryBuild("model must serialize to a JSON object".to_string())
		})?;

		let mut builder = db.insert(M::table_name());
		for (field, value) in fields {
			if field == M::primary_key_column() && value.is_null() {
				continue;
			}
			builder = builder.value(field.clone(), json_to_query_value(value));
		}

		let row = builder.returning_all().fetch_one().await.map_err(OrmError::Database)?;
		Ok(serde_json::from_value(row_to_json(&row))?)
	}

	/// Fetch exactly one row by primary key
	///
	/// # Errors
	///
	/// [`OrmError::NoResultFound`] when the key does not exist,
	/// [`OrmError::MultipleResultsFound`] when the key is ambiguous.
	pub async fn get(&self, db: &DatabaseConnection, pk: M::PrimaryKey) -> Result<M> {
		let results = self
			.filter(M::primary_key_column(), FilterOperator::Eq, pk.into())
			.all(db)
			.await?;
		match results.len() {
			0 => Err(OrmError::NoResultFound),
			1 => Ok(results.into_iter().next().unwrap()),
			n => Err(OrmError::MultipleResultsFound(n)),
		}
	}

	/// Count all rows in the table
	pub async fn count(&self, db: &DatabaseConnection) -> Result<u64> {
		self.all().count(db).await
	}
}

impl<M: Model> Default for Manager<M> {
	fn default() -> Self {
		Self::new()
	}
}
