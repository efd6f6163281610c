//! Query execution support
//!
//! Statement rendering for the active dialect plus the value conversions
//! between SeaQuery, the backends layer and serde_json model hydration.

use grappelli_backends::{DatabaseType, QueryValue, Row};
use sea_query::{
	PostgresQueryBuilder, SelectStatement, SqliteQueryBuilder, Value, Values,
};

/// Render a SELECT for the given dialect, converting bound values
pub(crate) fn render_select(
	database_type: DatabaseType,
	stmt: &SelectStatement,
) -> (String, Vec<QueryValue>) {
	let (sql, values) = match database_type {
		DatabaseType::Postgres => stmt.build(PostgresQueryBuilder),
		DatabaseType::Sqlite => stmt.build(SqliteQueryBuilder),
	};
	(sql, convert_values(values))
}

/// Convert a SeaQuery Value into a backend QueryValue
fn convert_value(value: Value) -> QueryValue {
	match value {
		// Null values
		Value::Bool(None)
		| Value::TinyInt(None)
		| Value::SmallInt(None)
		| Value::Int(None)
		| Value::BigInt(None)
		| Value::TinyUnsigned(None)
		| Value::SmallUnsigned(None)
		| Value::Unsigned(None)
		| Value::BigUnsigned(None)
		| Value::Float(None)
		| Value::Double(None)
		| Value::String(None)
		| Value::Char(None)
		| Value::Bytes(None)
		| Value::ChronoDate(None)
		| Value::ChronoTime(None)
		| Value::ChronoDateTime(None)
		| Value::ChronoDateTimeUtc(None)
		| Value::ChronoDateTimeLocal(None)
		| Value::ChronoDateTimeWithTimeZone(None)
		| Value::Json(None) => QueryValue::Null,

		// Boolean
		Value::Bool(Some(b)) => QueryValue::Bool(b),

		// Signed integers widen to i64
		Value::TinyInt(Some(v)) => QueryValue::Int(v as i64),
		Value::SmallInt(Some(v)) => QueryValue::Int(v as i64),
		Value::Int(Some(v)) => QueryValue::Int(v as i64),
		Value::BigInt(Some(v)) => QueryValue::Int(v),

		// Unsigned integers widen to i64, clamping the one lossy case
		Value::TinyUnsigned(Some(v)) => QueryValue::Int(v as i64),
		Value::SmallUnsigned(Some(v)) => QueryValue::Int(v as i64),
		Value::Unsigned(Some(v)) => QueryValue::Int(v as i64),
		Value::BigUnsigned(Some(v)) => QueryValue::Int(i64::try_from(v).unwrap_or_else(|_| {
			tracing::warn!(value = v, "u64 parameter exceeds i64::MAX, clamping");
			i64::MAX
		})),

		// Floating point
		Value::Float(Some(v)) => QueryValue::Float(v as f64),
		Value::Double(Some(v)) => QueryValue::Float(v),

		// Text
		Value::String(Some(s)) => QueryValue::String(s.to_string()),
		Value::Char(Some(c)) => QueryValue::String(c.to_string()),

		// Bytes
		Value::Bytes(Some(b)) => QueryValue::Bytes(b.to_vec()),

		// Chrono datetimes normalize to UTC
		Value::ChronoDateTimeUtc(Some(dt)) => QueryValue::Timestamp(dt),
		Value::ChronoDateTimeLocal(Some(dt)) => {
			QueryValue::Timestamp(dt.with_timezone(&chrono::Utc))
		}
		Value::ChronoDateTimeWithTimeZone(Some(dt)) => {
			QueryValue::Timestamp(dt.with_timezone(&chrono::Utc))
		}

		// Date-only / time-only values travel as text
		Value::ChronoDate(_) | Value::ChronoTime(_) | Value::ChronoDateTime(_) => {
			QueryValue::String(format!("{:?}", value))
		}

		// JSON travels as text
		Value::Json(_) => QueryValue::String(format!("{:?}", value)),

		// Enum values travel as text
		Value::Enum(_) => QueryValue::String(format!("{:?}", value)),
	}
}

/// Convert SeaQuery Values into backend QueryValues
pub(crate) fn convert_values(values: Values) -> Vec<QueryValue> {
	values.into_iter().map(convert_value).collect()
}

/// Convert one decoded cell into a JSON value for model hydration
fn query_value_to_json(value: &QueryValue) -> serde_json::Value {
	match value {
		QueryValue::Null => serde_json::Value::Null,
		QueryValue::Bool(b) => serde_json::Value::Bool(*b),
		QueryValue::Int(i) => serde_json::Value::Number((*i).into()),
		QueryValue::Float(f) => serde_json::Number::from_f64(*f)
			.map(serde_json::Value::Number)
			.unwrap_or(serde_json::Value::Null),
		QueryValue::String(s) => serde_json::Value::String(s.clone()),
		QueryValue::Bytes(b) => serde_json::to_value(b).unwrap_or(serde_json::Value::Null),
		QueryValue::Timestamp(dt) => serde_json::Value::String(dt.to_rfc3339()),
	}
}

/// Convert a result row into a JSON object for model hydration
pub(crate) fn row_to_json(row: &Row) -> serde_json::Value {
	let mut map = serde_json::Map::new();
	for (name, value) in row.columns() {
		map.insert(name.clone(), query_value_to_json(value));
	}
	serde_json::Value::Object(map)
}

/// Convert a serialized model field into a bindable QueryValue
pub(crate) fn json_to_query_value(value: &serde_json::Value) -> QueryValue {
	match value {
		serde_json::Value::Null => QueryValue::Null,
		serde_json::Value::Bool(b) => QueryValue::Bool(*b),
		serde_json::Value::Number(n) => match n.as_i64() {
			Some(i) => QueryValue::Int(i),
			None => QueryValue::Float(n.as_f64().unwrap_or(0.0)),
		},
		serde_json::Value::String(s) => QueryValue::String(s.clone()),
		// Arrays and nested objects are stored as JSON text
		other => QueryValue::String(other.to_string()),
	}
}
