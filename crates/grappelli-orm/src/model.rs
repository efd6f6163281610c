//! Model trait
//!
//! A model is a plain serde-serializable struct mapped onto one table. The
//! primary key field is `Option`-typed so a freshly constructed, not yet
//! inserted instance can carry `None` until the database assigns a value.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::manager::Manager;
use crate::query::FilterValue;

/// Database model mapped onto a single table
pub trait Model: Clone + Serialize + DeserializeOwned + Send + Sync {
	/// Primary key type
	type PrimaryKey: Clone + Send + Sync + Into<FilterValue>;

	/// Table this model maps to
	fn table_name() -> &'static str;

	/// Column holding the primary key
	fn primary_key_column() -> &'static str {
		"id"
	}

	/// The primary key of this instance, if assigned
	fn primary_key(&self) -> Option<&Self::PrimaryKey>;

	/// Record the database-assigned primary key on this instance
	fn set_primary_key(&mut self, value: Self::PrimaryKey);

	/// Entry point for queries on this model
	///
	/// ```rust,ignore
	/// let posts = Post::objects().all().all(&db).await?;
	/// ```
	fn objects() -> Manager<Self>
	where
		Self: Sized,
	{
		Manager::new()
	}
}
