//! Pagination Integration Tests
//!
//! Exercises length-aware pagination against a real database, covering:
//! - Page windows over plain column selections
//! - DISTINCT with and without explicit columns, with and without a
//!   narrowed select, and how each affects the total count
//! - JOIN + DISTINCT-on-key + table-star selection
//! - GROUP BY / HAVING totals through the counting subquery
//! - Page navigation metadata and error paths
//!
//! **Fixtures Used:**
//! - sqlite_connection: fresh in-memory SQLite database per test

use chrono::{DateTime, Utc};
use grappelli_backends::{DatabaseConnection, Schema};
use grappelli_orm::{FilterOperator, FilterValue, Model, OrmError};
use grappelli_pagination::PaginationError;
use grappelli_test::fixtures::sqlite_connection;
use grappelli_test::logging::init_test_logging;
use rstest::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Post {
	id: Option<i64>,
	title: Option<String>,
	user_id: Option<i64>,
	created_at: Option<DateTime<Utc>>,
	updated_at: Option<DateTime<Utc>>,
}

impl Model for Post {
	type PrimaryKey = i64;

	fn table_name() -> &'static str {
		"posts"
	}

	fn primary_key(&self) -> Option<&Self::PrimaryKey> {
		self.id.as_ref()
	}

	fn set_primary_key(&mut self, value: Self::PrimaryKey) {
		self.id = Some(value);
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
	id: Option<i64>,
	created_at: Option<DateTime<Utc>>,
	updated_at: Option<DateTime<Utc>>,
}

impl Model for User {
	type PrimaryKey = i64;

	fn table_name() -> &'static str {
		"users"
	}

	fn primary_key(&self) -> Option<&Self::PrimaryKey> {
		self.id.as_ref()
	}

	fn set_primary_key(&mut self, value: Self::PrimaryKey) {
		self.id = Some(value);
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Cost {
	id: Option<i64>,
	user_id: Option<i64>,
	cost: i64,
	created_at: Option<DateTime<Utc>>,
	updated_at: Option<DateTime<Utc>>,
}

impl Model for Cost {
	type PrimaryKey = i64;

	fn table_name() -> &'static str {
		"costs"
	}

	fn primary_key(&self) -> Option<&Self::PrimaryKey> {
		self.id.as_ref()
	}

	fn set_primary_key(&mut self, value: Self::PrimaryKey) {
		self.id = Some(value);
	}
}

async fn setup_schema(db: &DatabaseConnection) {
	init_test_logging();

	Schema::create(db, "posts", |table| {
		table.increments("id");
		table.string("title").nullable();
		table.unsigned_integer("user_id").nullable();
		table.timestamps();
	})
	.await
	.expect("failed to create posts table");

	Schema::create(db, "users", |table| {
		table.increments("id");
		table.timestamps();
	})
	.await
	.expect("failed to create users table");

	Schema::create(db, "costs", |table| {
		table.increments("id");
		table.unsigned_integer("user_id").nullable();
		table.integer("cost");
		table.timestamps();
	})
	.await
	.expect("failed to create costs table");
}

async fn create_post(db: &DatabaseConnection, title: &str, user_id: Option<i64>) -> Post {
	let post = Post {
		id: None,
		title: Some(title.to_string()),
		user_id,
		created_at: Some(Utc::now()),
		updated_at: Some(Utc::now()),
	};
	Post::objects()
		.create(db, &post)
		.await
		.expect("failed to insert post")
}

async fn create_user(db: &DatabaseConnection) -> User {
	let user = User {
		id: None,
		created_at: Some(Utc::now()),
		updated_at: Some(Utc::now()),
	};
	User::objects()
		.create(db, &user)
		.await
		.expect("failed to insert user")
}

async fn create_cost(db: &DatabaseConnection, cost: i64, user_id: Option<i64>) -> Cost {
	let row = Cost {
		id: None,
		user_id,
		cost,
		created_at: Some(Utc::now()),
		updated_at: Some(Utc::now()),
	};
	Cost::objects()
		.create(db, &row)
		.await
		.expect("failed to insert cost")
}

// ============================================================================
// Pagination over plain selections
// ============================================================================

/// Pagination on top of selected columns
///
/// **Test Intent**: A page of a narrowed column selection contains exactly
/// `per_page` items while the total spans the whole table
///
/// **Integration Point**: QuerySet::select → paginate_rows → Page
#[rstest]
#[tokio::test]
async fn pagination_on_top_of_columns(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for i in 1..=50 {
		create_post(&db, &format!("Title {}", i), None).await;
	}

	let page = Post::objects()
		.all()
		.select(&["id", "title"])
		.paginate_rows(&db, 1, 15)
		.await
		.unwrap();

	assert_eq!(page.len(), 15);
	assert_eq!(page.count, 50);
	assert_eq!(page.num_pages, 4);
}

/// Hydrated pagination returns models
///
/// **Test Intent**: Full-row pages hydrate into model instances with the
/// database-assigned keys present
#[rstest]
#[tokio::test]
async fn pagination_hydrates_models(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for i in 1..=20 {
		create_post(&db, &format!("Title {}", i), None).await;
	}

	let page = Post::objects()
		.all()
		.order_by(&["id"])
		.paginate(&db, 2, 6)
		.await
		.unwrap();

	assert_eq!(page.len(), 6);
	assert_eq!(page.count, 20);
	assert_eq!(page.number, 2);
	assert_eq!(page.object_list[0].id, Some(7));
	assert_eq!(page.object_list[0].title.as_deref(), Some("Title 7"));
}

// ============================================================================
// DISTINCT interactions
// ============================================================================

/// Pagination with DISTINCT
///
/// **Test Intent**: A bare `distinct()` dedups whole rows; with unique ids
/// every row survives, and fetch, count and pagination total all agree
///
/// **Integration Point**: QuerySet::distinct → all / count / paginate
#[rstest]
#[tokio::test]
async fn pagination_with_distinct(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for _ in 1..=3 {
		create_post(&db, "Hello world", None).await;
		create_post(&db, "Goodbye world", None).await;
	}

	let query = Post::objects().all().distinct();

	assert_eq!(query.all(&db).await.unwrap().len(), 6);
	assert_eq!(query.count(&db).await.unwrap(), 6);
	assert_eq!(query.paginate(&db, 1, 15).await.unwrap().count, 6);
}

/// Pagination with DISTINCT and a narrowed select
///
/// **Test Intent**: Narrowing the selection changes the fetched rows (two
/// distinct titles) but not the count or the pagination total, which keep
/// counting physical rows — the legacy length-aware behavior
///
/// **Not Intent**: column-scoped distinct (covered below)
#[rstest]
#[tokio::test]
async fn pagination_with_distinct_and_select(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for _ in 1..=3 {
		create_post(&db, "Hello world", None).await;
		create_post(&db, "Goodbye world", None).await;
	}

	let query = Post::objects().all().distinct().select(&["title"]);

	assert_eq!(query.rows(&db).await.unwrap().len(), 2);
	assert_eq!(query.count(&db).await.unwrap(), 6);
	assert_eq!(query.paginate_rows(&db, 1, 15).await.unwrap().count, 6);
}

/// Pagination with DISTINCT columns and a narrowed select
///
/// **Test Intent**: Explicit distinct columns narrow the counting aggregate
/// to `COUNT(DISTINCT title)`, so fetch, count and total all agree on 2
#[rstest]
#[tokio::test]
async fn pagination_with_distinct_columns_and_select(
	#[future] sqlite_connection: DatabaseConnection,
) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for _ in 1..=3 {
		create_post(&db, "Hello world", None).await;
		create_post(&db, "Goodbye world", None).await;
	}

	let query = Post::objects()
		.all()
		.distinct_on(&["title"])
		.select(&["title"]);

	assert_eq!(query.rows(&db).await.unwrap().len(), 2);
	assert_eq!(query.count(&db).await.unwrap(), 2);
	assert_eq!(query.paginate_rows(&db, 1, 15).await.unwrap().count, 2);
}

/// Pagination with DISTINCT columns, select and a join
///
/// **Test Intent**: Joining ten posts per user multiplies the row set, and
/// `distinct_on("users.id")` collapses it back to one row and one counted
/// key per user
///
/// **Integration Point**: QuerySet::join + distinct_on + qualified
/// table-star select → all / count / paginate
#[rstest]
#[tokio::test]
async fn pagination_with_distinct_columns_select_and_join(
	#[future] sqlite_connection: DatabaseConnection,
) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for i in 1..=5 {
		let user = create_user(&db).await;
		for _ in 1..=10 {
			create_post(&db, &format!("Title {}", i), user.id).await;
		}
	}

	let query = User::objects()
		.all()
		.join("posts", "posts.user_id", "users.id")
		.distinct_on(&["users.id"])
		.select(&["users.*"]);

	assert_eq!(query.all(&db).await.unwrap().len(), 5);
	assert_eq!(query.count(&db).await.unwrap(), 5);
	assert_eq!(query.paginate(&db, 1, 15).await.unwrap().count, 5);
}

// ============================================================================
// GROUP BY / HAVING
// ============================================================================

/// Pagination with HAVING constraints
///
/// **Test Intent**: A grouped-and-filtered query paginates over its groups:
/// only the user whose costs sum past the threshold survives, so the page
/// holds exactly one row
///
/// **Integration Point**: annotate_sum + group_by + having → counting
/// subquery → paginate_rows
#[rstest]
#[tokio::test]
async fn pagination_with_having_constraints(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for i in 1..=2 {
		let user = create_user(&db).await;
		for _ in 1..=3 {
			create_cost(&db, i, user.id).await;
		}
	}

	let page = Cost::objects()
		.all()
		.annotate_sum("cost", "total")
		.group_by(&["user_id"])
		.having("total", FilterOperator::Gt, 3)
		.paginate_rows(&db, 1, 15)
		.await
		.unwrap();

	assert_eq!(page.len(), 1);
	assert_eq!(page.count, 1);
	assert_eq!(page.object_list[0].get::<i64>("total").unwrap(), 6);
}

// ============================================================================
// Page navigation and edge cases
// ============================================================================

/// The last page is short and knows its place
#[rstest]
#[tokio::test]
async fn last_page_window(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for i in 1..=50 {
		create_post(&db, &format!("Title {}", i), None).await;
	}

	let page = Post::objects()
		.all()
		.order_by(&["id"])
		.paginate(&db, 4, 15)
		.await
		.unwrap();

	assert_eq!(page.len(), 5);
	assert!(page.has_previous());
	assert!(!page.has_next());
	assert_eq!(page.start_index(), 46);
	assert_eq!(page.end_index(), 50);
}

/// An empty table still yields exactly one (empty) page
#[rstest]
#[tokio::test]
async fn empty_table_paginates_to_one_empty_page(
	#[future] sqlite_connection: DatabaseConnection,
) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	let page = Post::objects().all().paginate(&db, 1, 15).await.unwrap();

	assert!(page.is_empty());
	assert_eq!(page.count, 0);
	assert_eq!(page.num_pages, 1);
	assert!(!page.has_next());
	assert!(!page.has_previous());
}

/// A zero page size is rejected instead of dividing by zero
#[rstest]
#[tokio::test]
async fn zero_per_page_is_an_error(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	let result = Post::objects().all().paginate(&db, 1, 0).await;

	assert!(matches!(
		result,
		Err(OrmError::Pagination(PaginationError::InvalidPageSize(0)))
	));
}

// ============================================================================
// Manager round-trips
// ============================================================================

/// Creating a model assigns the primary key and round-trips its fields
///
/// **Test Intent**: Manager::create inserts through bound parameters,
/// RETURNING hydrates the stored row, and Manager::get finds it again
#[rstest]
#[tokio::test]
async fn create_assigns_primary_key_and_roundtrips(
	#[future] sqlite_connection: DatabaseConnection,
) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	let created = create_post(&db, "Hello world", Some(3)).await;
	let id = *created.primary_key().expect("created post has no id");

	assert_eq!(created.title.as_deref(), Some("Hello world"));
	assert_eq!(created.user_id, Some(3));
	assert!(created.created_at.is_some());

	let fetched = Post::objects().get(&db, id).await.unwrap();
	assert_eq!(fetched.id, Some(id));
	assert_eq!(fetched.title.as_deref(), Some("Hello world"));

	let missing = Post::objects().get(&db, id + 1).await;
	assert!(matches!(missing, Err(OrmError::NoResultFound)));
}

/// Counting respects WHERE conditions
#[rstest]
#[tokio::test]
async fn count_respects_filters(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	create_post(&db, "Hello world", None).await;
	create_post(&db, "Hello world", None).await;
	create_post(&db, "Goodbye world", None).await;

	let hellos = Post::objects()
		.filter(
			"title",
			FilterOperator::Eq,
			FilterValue::String("Hello world".to_string()),
		)
		.count(&db)
		.await
		.unwrap();

	assert_eq!(hellos, 2);
	assert_eq!(Post::objects().count(&db).await.unwrap(), 3);
}

/// Ordering applies to fetches but never to totals
#[rstest]
#[tokio::test]
async fn ordering_and_first(#[future] sqlite_connection: DatabaseConnection) {
	let db = sqlite_connection.await;
	setup_schema(&db).await;

	for i in 1..=3 {
		create_post(&db, &format!("Title {}", i), None).await;
	}

	let newest = Post::objects()
		.all()
		.order_by(&["-id"])
		.first(&db)
		.await
		.unwrap()
		.expect("table is not empty");

	assert_eq!(newest.title.as_deref(), Some("Title 3"));
	assert_eq!(
		Post::objects().all().order_by(&["-id"]).count(&db).await.unwrap(),
		3
	);
}
