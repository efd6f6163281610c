//! # Grappelli ORM
//!
//! Django-style models and query sets for the Grappelli framework.
//!
//! Define a model as a plain struct implementing [`Model`], obtain its
//! [`Manager`] through `Model::objects()`, and chain a [`QuerySet`] into the
//! query you need. Terminal operations take an explicit
//! [`DatabaseConnection`](grappelli_backends::DatabaseConnection), which
//! keeps independent databases (one per test, for example) fully isolated.
//!
//! ```rust,no_run
//! use grappelli_orm::{FilterOperator, FilterValue, Model};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Post {
//!     id: Option<i64>,
//!     title: Option<String>,
//! }
//!
//! impl Model for Post {
//!     type PrimaryKey = i64;
//!
//!     fn table_name() -> &'static str {
//!         "posts"
//!     }
//!
//!     fn primary_key(&self) -> Option<&Self::PrimaryKey> {
//!         self.id.as_ref()
//!     }
//!
//!     fn set_primary_key(&mut self, value: Self::PrimaryKey) {
//!         self.id = Some(value);
//!     }
//! }
//!
//! # async fn example(db: &grappelli_backends::DatabaseConnection)
//! #     -> Result<(), grappelli_orm::OrmError> {
//! let titled = Post::objects()
//!     .filter("title", FilterOperator::Ne, FilterValue::Null)
//!     .count(db)
//!     .await?;
//! println!("{titled} posts have a title");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod execution;
pub mod manager;
pub mod model;
pub mod query;

pub use error::{OrmError, Result};
pub use manager::Manager;
pub use model::Model;
pub use query::{
	AggregateFunc, Filter, FilterOperator, FilterValue, QuerySet,
};
