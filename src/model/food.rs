use super::{check_text, nullable, required, Column, ColumnKind, Entity, Stamps};
use crate::error::AppError;
use crate::sql::SqlValue;
use serde::{Deserialize, Serialize};
use sqlx::any::AnyRow;
use sqlx::Row;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodKind {
    Fruit,
    Vegetable,
    Protein,
}

impl FoodKind {
    pub const VALUES: &'static [&'static str] = &["fruit", "vegetable", "protein"];

    pub fn as_str(self) -> &'static str {
        match self {
            FoodKind::Fruit => "fruit",
            FoodKind::Vegetable => "vegetable",
            FoodKind::Protein => "protein",
        }
    }
}

impl FromStr for FoodKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fruit" => Ok(FoodKind::Fruit),
            "vegetable" => Ok(FoodKind::Vegetable),
            "protein" => Ok(FoodKind::Protein),
            other => Err(format!("unknown food type '{}'", other)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub calories: i64,
    #[serde(rename = "type")]
    pub kind: FoodKind,
    #[serde(flatten)]
    pub stamps: Stamps,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewFood {
    pub name: String,
    pub calories: i64,
    #[serde(rename = "type")]
    pub kind: FoodKind,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FoodPatch {
    #[serde(default, deserialize_with = "nullable")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub calories: Option<Option<i64>>,
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub kind: Option<Option<FoodKind>>,
}

impl Entity for Food {
    const RESOURCE: &'static str = "Food";
    const TABLE: &'static str = "food";
    const COLUMNS: &'static [Column] = &[
        Column::required("name", ColumnKind::Text),
        Column::required("calories", ColumnKind::BigInt),
        Column::required("type", ColumnKind::Enum(FoodKind::VALUES)),
    ];

    type New = NewFood;
    type Patch = FoodPatch;

    fn id(&self) -> i64 {
        self.id
    }

    fn check_new(new: &NewFood) -> Result<(), AppError> {
        check_text("name", &new.name)
    }

    fn new_values(new: &NewFood) -> Vec<SqlValue> {
        vec![
            SqlValue::from(new.name.as_str()),
            SqlValue::from(new.calories),
            SqlValue::from(new.kind.as_str()),
        ]
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::from(self.name.as_str()),
            SqlValue::from(self.calories),
            SqlValue::from(self.kind.as_str()),
        ]
    }

    fn apply(&mut self, patch: FoodPatch) -> Result<(), AppError> {
        if let Some(name) = patch.name {
            let name = required("name", name)?;
            check_text("name", &name)?;
            self.name = name;
        }
        if let Some(calories) = patch.calories {
            self.calories = required("calories", calories)?;
        }
        if let Some(kind) = patch.kind {
            self.kind = required("type", kind)?;
        }
        Ok(())
    }

    fn from_row(row: &AnyRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("type")?;
        Ok(Food {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            calories: row.try_get("calories")?,
            kind: kind.parse().map_err(|e: String| sqlx::Error::ColumnDecode {
                index: "type".into(),
                source: e.into(),
            })?,
            stamps: Stamps::from_row(row)?,
        })
    }
}
