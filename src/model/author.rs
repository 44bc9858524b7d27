use super::{check_text, nullable, required, Column, ColumnKind, Entity, Stamps};
use crate::error::AppError;
use crate::sql::SqlValue;
use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::Row;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[serde(flatten)]
    pub stamps: Stamps,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewAuthor {
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthorPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
}

impl Entity for Author {
    const RESOURCE: &'static str = "Author";
    const TABLE: &'static str = "authors";
    const COLUMNS: &'static [Column] = &[Column::required("name", ColumnKind::Text)];

    type New = NewAuthor;
    type Patch = AuthorPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn check_new(new: &NewAuthor) -> Result<(), AppError> {
        check_text("name", &new.name)
    }

    fn new_values(new: &NewAuthor) -> Vec<SqlValue> {
        vec![SqlValue::from(new.name.as_str())]
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![SqlValue::from(self.name.as_str())]
    }

    fn apply(&mut self, patch: AuthorPatch) -> Result<(), AppError> {
        if let Some(name) = patch.name {
            let name = required("name", name)?;
            check_text("name", &name)?;
            self.name = name;
        }
        Ok(())
    }

    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        Ok(Author {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            stamps: Stamps::from_row(row)?,
        })
    }
}
