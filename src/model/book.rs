use super::{check_text, nullable, required, Column, ColumnKind, Entity, Reference, Stamps};
use crate::error::AppError;
use crate::sql::SqlValue;
use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::Row;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    /// Not checked against `authors`; the store's foreign key decides.
    pub author_id: Option<i64>,
    #[serde(flatten)]
    pub stamps: Stamps,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub author_id: Option<i64>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub author_id: Option<Option<i64>>,
}

impl Entity for Book {
    const RESOURCE: &'static str = "Book";
    const TABLE: &'static str = "books";
    const COLUMNS: &'static [Column] = &[
        Column::required("title", ColumnKind::Text),
        Column {
            name: "author_id",
            kind: ColumnKind::BigInt,
            nullable: true,
            references: Some(Reference {
                table: "authors",
                column: "id",
            }),
        },
    ];

    type New = NewBook;
    type Patch = BookPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn check_new(new: &NewBook) -> Result<(), AppError> {
        check_text("title", &new.title)
    }

    fn new_values(new: &NewBook) -> Vec<SqlValue> {
        vec![SqlValue::from(new.title.as_str()), SqlValue::from(new.author_id)]
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![SqlValue::from(self.title.as_str()), SqlValue::from(self.author_id)]
    }

    fn apply(&mut self, patch: BookPatch) -> Result<(), AppError> {
        if let Some(title) = patch.title {
            let title = required("title", title)?;
            check_text("title", &title)?;
            self.title = title;
        }
        if let Some(author_id) = patch.author_id {
            self.author_id = author_id;
        }
        Ok(())
    }

    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Book {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            author_id: row.try_get("author_id")?,
            stamps: Stamps::from_row(row)?,
        })
    }
}
