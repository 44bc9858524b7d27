//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for an entity.

use crate::config::Backend;
use crate::model::Entity;
use crate::sql::SqlValue;
use chrono::{DateTime, SecondsFormat, Utc};

/// Quote identifier (safe: only from entity definitions).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub fn timestamp_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    /// Bound values only; nulls are inlined.
    pub params: Vec<SqlValue>,
    backend: Backend,
}

impl QueryBuf {
    fn new(backend: Backend) -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
            backend,
        }
    }

    /// Returns the SQL fragment standing for `v`.
    fn push_param(&mut self, v: SqlValue) -> String {
        if v == SqlValue::Null {
            return "NULL".to_string();
        }
        self.params.push(v);
        self.backend.placeholder(self.params.len())
    }
}

/// Every column of the table, in the order records are decoded.
fn column_list<E: Entity>() -> String {
    let mut cols = vec![quoted("id")];
    cols.extend(E::COLUMNS.iter().map(|c| quoted(c.name)));
    cols.push(quoted("created_at"));
    cols.push(quoted("updated_at"));
    cols.join(", ")
}

/// SELECT every row, oldest first.
pub fn select_all<E: Entity>(backend: Backend) -> QueryBuf {
    let mut q = QueryBuf::new(backend);
    q.sql = format!("SELECT {} FROM {} ORDER BY {}", column_list::<E>(), quoted(E::TABLE), quoted("id"));
    q
}

/// SELECT by primary key.
pub fn select_by_id<E: Entity>(backend: Backend, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new(backend);
    let ph = q.push_param(SqlValue::Int(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        column_list::<E>(),
        quoted(E::TABLE),
        quoted("id"),
        ph
    );
    q
}

/// INSERT one row; the store assigns the id. Both timestamps are set to `now`.
pub fn insert<E: Entity>(backend: Backend, values: Vec<SqlValue>, now: DateTime<Utc>) -> QueryBuf {
    let mut q = QueryBuf::new(backend);
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (c, v) in E::COLUMNS.iter().zip(values) {
        cols.push(quoted(c.name));
        placeholders.push(q.push_param(v));
    }
    let stamp = timestamp_text(now);
    for name in ["created_at", "updated_at"] {
        cols.push(quoted(name));
        placeholders.push(q.push_param(SqlValue::Text(stamp.clone())));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(E::TABLE),
        cols.join(", "),
        placeholders.join(", "),
        column_list::<E>()
    );
    q
}

/// UPDATE every data column of one row and refresh `updated_at`.
pub fn update<E: Entity>(backend: Backend, id: i64, values: Vec<SqlValue>, now: DateTime<Utc>) -> QueryBuf {
    let mut q = QueryBuf::new(backend);
    let mut sets = Vec::new();
    for (c, v) in E::COLUMNS.iter().zip(values) {
        let rhs = q.push_param(v);
        sets.push(format!("{} = {}", quoted(c.name), rhs));
    }
    let rhs = q.push_param(SqlValue::Text(timestamp_text(now)));
    sets.push(format!("{} = {}", quoted("updated_at"), rhs));
    let id_ph = q.push_param(SqlValue::Int(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(E::TABLE),
        sets.join(", "),
        quoted("id"),
        id_ph,
        column_list::<E>()
    );
    q
}

/// DELETE by id, returning the row as it was.
pub fn delete<E: Entity>(backend: Backend, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new(backend);
    let ph = q.push_param(SqlValue::Int(id));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {} RETURNING {}",
        quoted(E::TABLE),
        quoted("id"),
        ph,
        column_list::<E>()
    );
    q
}
