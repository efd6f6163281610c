//! # Grappelli Database Backends
//!
//! Low-level database abstraction for the Grappelli framework.
//!
//! This crate provides:
//! - **Backends**: a [`DatabaseBackend`] trait with SQLite and PostgreSQL
//!   implementations over `sqlx` connection pools
//! - **Values and rows**: [`QueryValue`] and [`Row`] as the dialect-neutral
//!   exchange types between SQL results and the ORM layer
//! - **Connections**: [`DatabaseConnection`], a cheaply clonable handle that
//!   dispatches to the active backend
//! - **Configuration**: [`DatabaseConfig`] for engine/location settings
//! - **Schema definition**: [`Schema`] and [`TableBlueprint`] for building
//!   `CREATE TABLE` statements from a column DSL
//! - **Insert building**: [`InsertBuilder`] with parameterized values and
//!   RETURNING support
//!
//! All SQL is rendered through `sea-query` for the active dialect, and all
//! values travel as bound parameters.

pub mod backend;
pub mod config;
pub mod connection;
pub mod error;
pub mod query_builder;
pub mod schema;
pub mod types;

pub mod dialect;

pub use backend::DatabaseBackend;
pub use config::DatabaseConfig;
pub use connection::DatabaseConnection;
pub use error::{DatabaseError, Result};
pub use query_builder::InsertBuilder;
pub use schema::{Schema, TableBlueprint};
pub use types::{DatabaseType, QueryResult, QueryValue, Row};

#[cfg(feature = "postgres")]
pub use dialect::postgres::PostgresBackend;
#[cfg(feature = "sqlite")]
pub use dialect::sqlite::SqliteBackend;
