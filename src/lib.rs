//! # Grappelli
//!
//! A Django-inspired ORM and length-aware pagination layer for Rust.
//!
//! Grappelli provides the database slice of a batteries-included web stack:
//! model definitions over plain structs, a chainable query set, pluggable
//! SQL backends, and pagination that always knows the total row count.
//! It follows Rust's composition patterns instead of Python's inheritance
//! model, making full use of traits, generics, and async/await.
//!
//! ## Crates
//!
//! - [`backends`] - database connections, dialects, values and rows
//! - [`orm`] - `Model`, `Manager` and `QuerySet`
//! - [`pagination`] - `Page`, `Paginator` and response envelopes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grappelli::prelude::*;
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
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = DatabaseConnection::connect_sqlite("sqlite::memory:").await?;
//! let page = Post::objects().all().paginate(&db, 1, 15).await?;
//! println!("{} posts in total", page.count);
//! # Ok(())
//! # }
//! ```

pub use grappelli_backends as backends;
pub use grappelli_orm as orm;
pub use grappelli_pagination as pagination;

/// Commonly used types, importable in one line.
pub mod prelude {
	pub use grappelli_backends::{
		DatabaseConfig, DatabaseConnection, DatabaseError, DatabaseType, QueryValue, Row, Schema,
		TableBlueprint,
	};
	pub use grappelli_orm::{
		FilterOperator, FilterValue, Manager, Model, OrmError, QuerySet,
	};
	pub use grappelli_pagination::{Page, PaginatedResponse, PaginationError, Paginator};
}
