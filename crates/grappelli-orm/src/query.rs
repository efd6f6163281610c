//! Chainable query sets
//!
//! `QuerySet` accumulates query state (filters, column selection, joins,
//! grouping, ordering, windows) and renders it through SeaQuery for the
//! connection's dialect when a terminal operation runs. Terminal operations
//! never mutate the query set, so one value can serve `rows`, `count` and
//! `paginate` in a single test or request.
//!
//! ## Counting rules
//!
//! `count` (and the total computed by `paginate`) intentionally does not
//! mirror the row set a narrowed `select` would return:
//!
//! 1. a query with `group_by`/`having` is wrapped in a subquery and the
//!    surviving groups are counted;
//! 2. `distinct_on(columns)` counts `COUNT(DISTINCT columns)`;
//! 3. otherwise `COUNT(*)` over the filtered rows — a bare `distinct()`
//!    flag and any selected columns are ignored.
//!
//! Rule 3 preserves the legacy behavior of length-aware paginators in the
//! frameworks this layer is modeled on: `distinct()` without explicit
//! columns dedups whole physical rows, and those are exactly what
//! `COUNT(*)` counts.

use std::marker::PhantomData;

use grappelli_backends::{DatabaseConnection, Row};
use grappelli_pagination::{Page, Paginator};
use sea_query::{
	Alias, Asterisk, ColumnRef, Condition, Expr, ExprTrait, Func, IntoColumnRef, JoinType, Order,
	Query, SelectStatement,
};
use serde::{Deserialize, Serialize};

use crate::error::{OrmError, Result};
use crate::execution::{render_select, row_to_json};
use crate::model::Model;

/// Filter comparison operators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FilterOperator {
	Eq,
	Ne,
	Gt,
	Gte,
	Lt,
	Lte,
	IsNull,
	IsNotNull,
}

/// Filter comparison values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FilterValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
}

impl From<i64> for FilterValue {
	fn from(i: i64) -> Self {
		FilterValue::Int(i)
	}
}

impl From<i32> for FilterValue {
	fn from(i: i32) -> Self {
		FilterValue::Int(i as i64)
	}
}

impl From<f64> for FilterValue {
	fn from(f: f64) -> Self {
		FilterValue::Float(f)
	}
}

impl From<bool> for FilterValue {
	fn from(b: bool) -> Self {
		FilterValue::Bool(b)
	}
}

impl From<&str> for FilterValue {
	fn from(s: &str) -> Self {
		FilterValue::String(s.to_string())
	}
}

impl From<String> for FilterValue {
	fn from(s: String) -> Self {
		FilterValue::String(s)
	}
}

/// One WHERE (or HAVING) condition
#[derive(Debug, Clone)]
pub struct Filter {
	pub field: String,
	pub operator: FilterOperator,
	pub value: FilterValue,
}

impl Filter {
	pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
		Self {
			field: field.into(),
			operator,
			value,
		}
	}

	fn to_expr(&self) -> Expr {
		let column = Expr::col(column_ref(&self.field));
		match (&self.operator, &self.value) {
			// Equality against NULL means the SQL NULL predicates
			(FilterOperator::Eq, FilterValue::Null) | (FilterOperator::IsNull, _) => {
				column.is_null()
			}
			(FilterOperator::Ne, FilterValue::Null) | (FilterOperator::IsNotNull, _) => {
				column.is_not_null()
			}
			(FilterOperator::Eq, v) => column.eq(filter_value_to_sea(v)),
			(FilterOperator::Ne, v) => column.ne(filter_value_to_sea(v)),
			(FilterOperator::Gt, v) => column.gt(filter_value_to_sea(v)),
			(FilterOperator::Gte, v) => column.gte(filter_value_to_sea(v)),
			(FilterOperator::Lt, v) => column.lt(filter_value_to_sea(v)),
			(FilterOperator::Lte, v) => column.lte(filter_value_to_sea(v)),
		}
	}
}

/// Aggregate functions usable in annotations
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum AggregateFunc {
	Sum,
	Count,
	Avg,
	Min,
	Max,
}

/// An aggregate expression selected under an alias
#[derive(Debug, Clone)]
struct Annotation {
	func: AggregateFunc,
	column: String,
	alias: String,
}

impl Annotation {
	fn to_expr(&self) -> Expr {
		let column = Expr::col(column_ref(&self.column));
		match self.func {
			AggregateFunc::Sum => Func::sum(column).into(),
			AggregateFunc::Count => Func::count(column).into(),
			AggregateFunc::Avg => Func::avg(column).into(),
			AggregateFunc::Min => Func::min(column).into(),
			AggregateFunc::Max => Func::max(column).into(),
		}
	}
}

/// An inner join on column equality
#[derive(Debug, Clone)]
struct Join {
	table: String,
	lhs: String,
	rhs: String,
}

fn filter_value_to_sea(value: &FilterValue) -> sea_query::Value {
	match value {
		FilterValue::Null => sea_query::Value::BigInt(None),
		FilterValue::Bool(b) => sea_query::Value::Bool(Some(*b)),
		FilterValue::Int(i) => sea_query::Value::BigInt(Some(*i)),
		FilterValue::Float(f) => sea_query::Value::Double(Some(*f)),
		FilterValue::String(s) => sea_query::Value::String(Some(s.clone().into())),
	}
}

/// Resolve a possibly qualified column name
///
/// Splits on the first `.` so `users.id` becomes `"users"."id"` and
/// `users.*` becomes `"users".*` instead of one quoted identifier.
fn column_ref(name: &str) -> ColumnRef {
	match name.split_once('.') {
		Some((table, "*")) => (Alias::new(table), Asterisk).into_column_ref(),
		Some((table, column)) => (Alias::new(table), Alias::new(column)).into_column_ref(),
		None if name == "*" => Asterisk.into_column_ref(),
		None => Alias::new(name).into_column_ref(),
	}
}

/// Chainable query over one model's table
pub struct QuerySet<M: Model> {
	filters: Vec<Filter>,
	selects: Vec<String>,
	annotations: Vec<Annotation>,
	distinct_enabled: bool,
	distinct_columns: Vec<String>,
	joins: Vec<Join>,
	group_by_columns: Vec<String>,
	havings: Vec<Filter>,
	order_by_fields: Vec<String>,
	limit: Option<u64>,
	offset: Option<u64>,
	_marker: PhantomData<M>,
}

impl<M: Model> Clone for QuerySet<M> {
	fn clone(&self) -> Self {
		Self {
			filters: self.filters.clone(),
			selects: self.selects.clone(),
			annotations: self.annotations.clone(),
			distinct_enabled: self.distinct_enabled,
			distinct_columns: self.distinct_columns.clone(),
			joins: self.joins.clone(),
			group_by_columns: self.group_by_columns.clone(),
			havings: self.havings.clone(),
			order_by_fields: self.order_by_fields.clone(),
			limit: self.limit,
			offset: self.offset,
			_marker: PhantomData,
		}
	}
}

impl<M: Model> Default for QuerySet<M> {
	fn default() -> Self {
		Self::new()
	}
}

impl<M: Model> QuerySet<M> {
	pub fn new() -> Self {
		Self {
			filters: Vec::new(),
			selects: Vec::new(),
			annotations: Vec::new(),
			distinct_enabled: false,
			distinct_columns: Vec::new(),
			joins: Vec::new(),
			group_by_columns: Vec::new(),
			havings: Vec::new(),
			order_by_fields: Vec::new(),
			limit: None,
			offset: None,
			_marker: PhantomData,
		}
	}

	/// Add a WHERE condition
	pub fn filter(
		mut self,
		field: impl Into<String>,
		operator: FilterOperator,
		value: FilterValue,
	) -> Self {
		self.filters.push(Filter::new(field, operator, value));
		self
	}

	/// Narrow the selected columns
	///
	/// Accepts qualified names (`users.id`) and table stars (`users.*`).
	/// Narrowed selections cannot hydrate full models; read them through
	/// [`rows`](Self::rows) or [`paginate_rows`](Self::paginate_rows).
	pub fn select(mut self, columns: &[&str]) -> Self {
		self.selects = columns.iter().map(|s| s.to_string()).collect();
		self
	}

	/// Select an aggregate under an alias
	pub fn annotate(
		mut self,
		func: AggregateFunc,
		column: impl Into<String>,
		alias: impl Into<String>,
	) -> Self {
		self.annotations.push(Annotation {
			func,
			column: column.into(),
			alias: alias.into(),
		});
		self
	}

	/// Select `SUM(column) AS alias`
	pub fn annotate_sum(self, column: impl Into<String>, alias: impl Into<String>) -> Self {
		self.annotate(AggregateFunc::Sum, column, alias)
	}

	/// Return only distinct rows
	pub fn distinct(mut self) -> Self {
		self.distinct_enabled = true;
		self
	}

	/// Return only distinct rows, and count distinct values of `columns`
	///
	/// Unlike a bare [`distinct`](Self::distinct), the named columns also
	/// narrow the counting aggregate (rule 2 of the counting rules).
	pub fn distinct_on(mut self, columns: &[&str]) -> Self {
		self.distinct_columns = columns.iter().map(|s| s.to_string()).collect();
		self
	}

	/// Inner join on column equality
	///
	/// ```rust,ignore
	/// User::objects().all().join("posts", "posts.user_id", "users.id")
	/// ```
	pub fn join(
		mut self,
		table: impl Into<String>,
		lhs: impl Into<String>,
		rhs: impl Into<String>,
	) -> Self {
		self.joins.push(Join {
			table: table.into(),
			lhs: lhs.into(),
			rhs: rhs.into(),
		});
		self
	}

	/// Group by the given columns
	pub fn group_by(mut self, columns: &[&str]) -> Self {
		self.group_by_columns = columns.iter().map(|s| s.to_string()).collect();
		self
	}

	/// Add a HAVING condition (typically against an annotation alias)
	pub fn having(
		mut self,
		column: impl Into<String>,
		operator: FilterOperator,
		value: impl Into<FilterValue>,
	) -> Self {
		self.havings.push(Filter::new(column, operator, value.into()));
		self
	}

	/// Order by fields; prefix a field with `-` for descending order
	pub fn order_by(mut self, fields: &[&str]) -> Self {
		self.order_by_fields = fields.iter().map(|s| s.to_string()).collect();
		self
	}

	/// Set LIMIT
	pub fn limit(mut self, limit: u64) -> Self {
		self.limit = Some(limit);
		self
	}

	/// Set OFFSET
	pub fn offset(mut self, offset: u64) -> Self {
		self.offset = Some(offset);
		self
	}

	fn build_where_condition(&self) -> Option<Condition> {
		if self.filters.is_empty() {
			return None;
		}
		let mut condition = Condition::all();
		for filter in &self.filters {
			condition = condition.add(filter.to_expr());
		}
		Some(condition)
	}

	/// Build the SELECT for this query set
	///
	/// `with_window` controls ORDER BY / LIMIT / OFFSET; counting queries
	/// leave them out.
	fn build_select(&self, with_window: bool) -> SelectStatement {
		let mut stmt = Query::select();
		stmt.from(Alias::new(M::table_name()));

		if self.selects.is_empty() && self.annotations.is_empty() {
			stmt.column(Asterisk);
		} else {
			for column in &self.selects {
				stmt.column(column_ref(column));
			}
		}
		for annotation in &self.annotations {
			stmt.expr_as(annotation.to_expr(), Alias::new(&annotation.alias));
		}

		if self.distinct_enabled || !self.distinct_columns.is_empty() {
			stmt.distinct();
		}

		for join in &self.joins {
			stmt.join(
				JoinType::InnerJoin,
				Alias::new(&join.table),
				Expr::col(column_ref(&join.lhs)).equals(column_ref(&join.rhs)),
			);
		}

		if let Some(condition) = self.build_where_condition() {
			stmt.cond_where(condition);
		}

		for column in &self.group_by_columns {
			stmt.group_by_col(column_ref(column));
		}
		for having in &self.havings {
			stmt.and_having(having.to_expr());
		}

		if with_window {
			for field in &self.order_by_fields {
				match field.strip_prefix('-') {
					Some(name) => stmt.order_by(column_ref(name), Order::Desc),
					None => stmt.order_by(column_ref(field), Order::Asc),
				};
			}
			if let Some(limit) = self.limit {
				stmt.limit(limit);
			}
			if let Some(offset) = self.offset {
				stmt.offset(offset);
			}
		}

		stmt
	}

	/// Build the counting query for this query set
	fn build_count(&self) -> SelectStatement {
		// Rule 1: grouped queries count surviving groups through a subquery
		if !self.group_by_columns.is_empty() || !self.havings.is_empty() {
			let inner = self.build_select(false);
			let mut stmt = Query::select();
			stmt.expr_as(
				Func::count(Expr::col(Asterisk)),
				Alias::new("count"),
			);
			stmt.from_subquery(inner, Alias::new("aggregate_table"));
			return stmt;
		}

		let mut stmt = Query::select();
		stmt.from(Alias::new(M::table_name()));
		for join in &self.joins {
			stmt.join(
				JoinType::InnerJoin,
				Alias::new(&join.table),
				Expr::col(column_ref(&join.lhs)).equals(column_ref(&join.rhs)),
			);
		}
		if let Some(condition) = self.build_where_condition() {
			stmt.cond_where(condition);
		}

		if !self.distinct_columns.is_empty() {
			// Rule 2: explicit distinct columns narrow the aggregate
			let expr = if self.distinct_columns.len() == 1 {
				Expr::col(column_ref(&self.distinct_columns[0]))
			} else {
				Expr::tuple(
					self.distinct_columns
						.iter()
						.map(|column| Expr::col(column_ref(column))),
				)
			};
			stmt.expr_as(Func::count_distinct(expr), Alias::new("count"));
		} else {
			// Rule 3: COUNT(*) regardless of selects or a bare distinct()
			stmt.expr_as(
				Func::count(Expr::col(Asterisk)),
				Alias::new("count"),
			);
		}
		stmt
	}

	/// Fetch all rows, hydrated into models
	pub async fn all(&self, db: &DatabaseConnection) -> Result<Vec<M>> {
		let stmt = self.build_select(true);
		let (sql, params) = render_select(db.database_type(), &stmt);
		tracing::debug!(sql = %sql, "executing SELECT");
		let rows = db.fetch_all(&sql, params).await?;
		let mut results = Vec::with_capacity(rows.len());
		for row in rows {
			results.push(serde_json::from_value(row_to_json(&row))?);
		}
		Ok(results)
	}

	/// Fetch all rows without hydration
	///
	/// The raw counterpart of [`all`](Self::all) for narrowed selections and
	/// annotated queries whose rows do not shape up as full models.
	pub async fn rows(&self, db: &DatabaseConnection) -> Result<Vec<Row>> {
		let stmt = self.build_select(true);
		let (sql, params) = render_select(db.database_type(), &stmt);
		tracing::debug!(sql = %sql, "executing SELECT");
		Ok(db.fetch_all(&sql, params).await?)
	}

	/// Fetch the first row, if any
	pub async fn first(&self, db: &DatabaseConnection) -> Result<Option<M>> {
		let mut results = self.clone().limit(1).all(db).await?;
		Ok(results.drain(..).next())
	}

	/// Count matching rows according to the counting rules
	pub async fn count(&self, db: &DatabaseConnection) -> Result<u64> {
		let stmt = self.build_count();
		let (sql, params) = render_select(db.database_type(), &stmt);
		tracing::debug!(sql = %sql, "executing COUNT");
		match db.fetch_optional(&sql, params).await? {
			Some(row) => {
				let count: i64 = row.get("count").map_err(OrmError::Database)?;
				Ok(Ord::max(count, 0) as u64)
			}
			None => Ok(0),
		}
	}

	/// Whether any row matches
	pub async fn exists(&self, db: &DatabaseConnection) -> Result<bool> {
		Ok(self.count(db).await? > 0)
	}

	/// Fetch one page of models plus the total count
	///
	/// The total honors the counting rules, so it can disagree with the
	/// length of a narrowed row set on purpose (see the module docs). Page
	/// numbers below 1 are clamped to the first page; any limit/offset
	/// already on the query set is replaced by the page window.
	pub async fn paginate(
		&self,
		db: &DatabaseConnection,
		page: usize,
		per_page: usize,
	) -> Result<Page<M>> {
		let (window, paginator, number) = self.page_window(db, page, per_page).await?;
		let items = window.all(db).await?;
		Ok(Page::new(items, number, &paginator))
	}

	/// Fetch one page of raw rows plus the total count
	pub async fn paginate_rows(
		&self,
		db: &DatabaseConnection,
		page: usize,
		per_page: usize,
	) -> Result<Page<Row>> {
		let (window, paginator, number) = self.page_window(db, page, per_page).await?;
		let items = window.rows(db).await?;
		Ok(Page::new(items, number, &paginator))
	}

	async fn page_window(
		&self,
		db: &DatabaseConnection,
		page: usize,
		per_page: usize,
	) -> Result<(Self, Paginator, usize)> {
		let total = self.count(db).await? as usize;
		let paginator = Paginator::new(total, per_page)?;
		let number = page.max(1);
		let (offset, limit) = paginator.window(number);
		let window = self.clone().offset(offset as u64).limit(limit as u64);
		Ok((window, paginator, number))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use sea_query::SqliteQueryBuilder;
	use serde::{Deserialize, Serialize};

	#[derive(Debug, Clone, Serialize, Deserialize)]
	struct Post {
		id: Option<i64>,
		title: Option<String>,
		user_id: Option<i64>,
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

	fn sql(stmt: &SelectStatement) -> String {
		stmt.to_string(SqliteQueryBuilder)
	}

	#[test]
	fn select_all_columns() {
		let qs = QuerySet::<Post>::new();
		assert_eq!(sql(&qs.build_select(true)), r#"SELECT * FROM "posts""#);
	}

	#[test]
	fn select_distinct_rows() {
		let qs = QuerySet::<Post>::new().distinct();
		assert_eq!(
			sql(&qs.build_select(true)),
			r#"SELECT DISTINCT * FROM "posts""#
		);
	}

	#[test]
	fn select_narrowed_distinct() {
		let qs = QuerySet::<Post>::new().distinct().select(&["title"]);
		assert_eq!(
			sql(&qs.build_select(true)),
			r#"SELECT DISTINCT "title" FROM "posts""#
		);
	}

	#[test]
	fn qualified_columns_and_table_star() {
		let qs = QuerySet::<User>::new()
			.join("posts", "posts.user_id", "users.id")
			.distinct_on(&["users.id"])
			.select(&["users.*"]);
		let rendered = sql(&qs.build_select(true));

		assert!(rendered.contains(r#"SELECT DISTINCT "users".*"#));
		assert!(rendered.contains(r#"INNER JOIN "posts" ON "posts"."user_id" = "users"."id""#));
	}

	#[test]
	fn count_plain_is_count_star() {
		let qs = QuerySet::<Post>::new();
		assert_eq!(
			sql(&qs.build_count()),
			r#"SELECT COUNT(*) AS "count" FROM "posts""#
		);
	}

	#[test]
	fn count_ignores_bare_distinct_and_selects() {
		// Rule 3: counting stays COUNT(*) for a bare distinct()
		let qs = QuerySet::<Post>::new().distinct().select(&["title"]);
		assert_eq!(
			sql(&qs.build_count()),
			r#"SELECT COUNT(*) AS "count" FROM "posts""#
		);
	}

	#[test]
	fn count_with_distinct_columns() {
		let qs = QuerySet::<Post>::new().distinct_on(&["title"]).select(&["title"]);
		assert_eq!(
			sql(&qs.build_count()),
			r#"SELECT COUNT(DISTINCT "title") AS "count" FROM "posts""#
		);
	}

	#[test]
	fn count_with_join_and_distinct_columns() {
		let qs = QuerySet::<User>::new()
			.join("posts", "posts.user_id", "users.id")
			.distinct_on(&["users.id"])
			.select(&["users.*"]);
		let rendered = sql(&qs.build_count());

		assert!(rendered.contains(r#"COUNT(DISTINCT "users"."id")"#));
		assert!(rendered.contains(r#"INNER JOIN "posts""#));
	}

	#[test]
	fn count_wraps_grouped_queries() {
		let qs = QuerySet::<Post>::new()
			.annotate_sum("cost", "total")
			.group_by(&["user_id"])
			.having("total", FilterOperator::Gt, 3);
		let rendered = sql(&qs.build_count());

		assert!(rendered.starts_with(r#"SELECT COUNT(*) AS "count" FROM (SELECT"#));
		assert!(rendered.contains(r#"SUM("cost") AS "total""#));
		assert!(rendered.contains(r#"GROUP BY "user_id""#));
		assert!(rendered.contains(r#"HAVING "total" > 3"#));
		assert!(rendered.contains(r#") AS "aggregate_table""#));
	}

	#[test]
	fn grouped_count_ignores_window() {
		// ORDER BY / LIMIT / OFFSET must not leak into the counting subquery
		let qs = QuerySet::<Post>::new()
			.group_by(&["user_id"])
			.order_by(&["-id"])
			.limit(5)
			.offset(10);
		let rendered = sql(&qs.build_count());

		assert!(!rendered.contains("ORDER BY"));
		assert!(!rendered.contains("LIMIT"));
		assert!(!rendered.contains("OFFSET"));
	}

	#[test]
	fn where_conditions_render() {
		let qs = QuerySet::<Post>::new()
			.filter("title", FilterOperator::Ne, FilterValue::Null)
			.filter("user_id", FilterOperator::Gt, FilterValue::Int(10));
		let rendered = sql(&qs.build_select(true));

		assert!(rendered.contains(r#""title" IS NOT NULL"#));
		assert!(rendered.contains(r#""user_id" > 10"#));
	}

	#[test]
	fn postgres_dialect_renders_placeholders() {
		use sea_query::PostgresQueryBuilder;

		let qs = QuerySet::<User>::new()
			.join("posts", "posts.user_id", "users.id")
			.distinct_on(&["users.id"])
			.filter("users.id", FilterOperator::Gt, FilterValue::Int(0));
		let (rendered, values) = qs.build_count().build(PostgresQueryBuilder);

		assert!(rendered.contains(r#"COUNT(DISTINCT "users"."id")"#));
		assert!(rendered.contains(r#"INNER JOIN "posts""#));
		assert!(rendered.contains("$1"));
		assert_eq!(values.into_iter().count(), 1);
	}

	#[test]
	fn order_limit_offset_render() {
		let qs = QuerySet::<Post>::new()
			.order_by(&["-id", "title"])
			.limit(15)
			.offset(30);
		let rendered = sql(&qs.build_select(true));

		assert!(rendered.contains(r#"ORDER BY "id" DESC, "title" ASC"#));
		assert!(rendered.contains("LIMIT 15"));
		assert!(rendered.contains("OFFSET 30"));
	}
}
