//! Entity definitions: record structs, column metadata, create and patch payloads.

mod author;
mod book;
mod food;

pub use author::{Author, AuthorPatch, NewAuthor};
pub use book::{Book, BookPatch, NewBook};
pub use food::{Food, FoodKind, FoodPatch, NewFood};

use crate::error::AppError;
use crate::sql::SqlValue;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::any::AnyRow;

/// Storage type of a data column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    BigInt,
    /// Text restricted to a fixed set of values.
    Enum(&'static [&'static str]),
}

/// A foreign key to another table's `id`.
#[derive(Clone, Copy, Debug)]
pub struct Reference {
    pub table: &'static str,
    pub column: &'static str,
}

/// One data column. `id`, `created_at` and `updated_at` are implicit on every table.
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub references: Option<Reference>,
}

impl Column {
    pub const fn required(name: &'static str, kind: ColumnKind) -> Self {
        Column {
            name,
            kind,
            nullable: false,
            references: None,
        }
    }
}

/// A resource stored in its own table and exposed as a REST collection.
pub trait Entity: Serialize + Send + Sync + Sized + 'static {
    /// Singular name used in error bodies, e.g. `Author not found`.
    const RESOURCE: &'static str;
    const TABLE: &'static str;
    /// Data columns in bind order.
    const COLUMNS: &'static [Column];

    /// Body accepted on create.
    type New: DeserializeOwned + Send + Sync;
    /// Body accepted on update; absent fields are left untouched.
    type Patch: DeserializeOwned + Send + Sync;

    fn id(&self) -> i64;

    /// Checks constraints serde cannot express (lengths, emptiness).
    fn check_new(new: &Self::New) -> Result<(), AppError>;

    /// Values for `COLUMNS` from a create payload.
    fn new_values(new: &Self::New) -> Vec<SqlValue>;

    /// Values for `COLUMNS` from a stored record.
    fn values(&self) -> Vec<SqlValue>;

    /// Merges a patch into the record, validating every field it touches.
    fn apply(&mut self, patch: Self::Patch) -> Result<(), AppError>;

    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error>;
}

/// Store-managed fields shared by every record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Stamps {
    pub fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Stamps {
            created_at: timestamp_column(row, "created_at")?,
            updated_at: timestamp_column(row, "updated_at")?,
        })
    }
}

/// Timestamps are stored as RFC 3339 text so both backends read them the same way.
fn timestamp_column(row: &AnyRow, name: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    use sqlx::Row;
    let raw: String = row.try_get(name)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: name.to_string(),
            source: Box::new(e),
        })
}

/// Lets a patch tell an explicit `null` (`Some(None)`) apart from an absent field (`None`).
/// Use with `#[serde(default, deserialize_with = "nullable")]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Maximum length of a string column.
pub const MAX_TEXT_LEN: usize = 255;

/// Required text: non-empty and at most `MAX_TEXT_LEN` characters.
pub fn check_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

/// Unwraps a patched required field; an explicit `null` is rejected.
pub fn required<T>(field: &str, value: Option<T>) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("{} cannot be null", field)))
}
