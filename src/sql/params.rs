//! Values bound to store queries.

use sqlx::any::{Any, AnyArguments};
use sqlx::query::Query;

/// A column value. `Null` is rendered as a literal by the builder rather than bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Text(String),
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Int(n)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Binds every non-null parameter, in order.
pub fn bind_all<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    params: &[SqlValue],
) -> Query<'q, Any, AnyArguments<'q>> {
    for p in params {
        query = match p {
            SqlValue::Null => query,
            SqlValue::Int(n) => query.bind(*n),
            SqlValue::Text(s) => query.bind(s.clone()),
        };
    }
    query
}
