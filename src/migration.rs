//! Schema sync: create entity tables and their foreign keys if absent.
//! Tables are created in dependency order (referenced tables first).

use crate::config::Backend;
use crate::error::AppError;
use crate::model::{Author, Book, ColumnKind, Entity, Food};
use crate::sql::quoted;
use crate::store::Database;

/// Ensures every entity table exists. Never alters or drops existing tables.
pub async fn sync_schema(db: &Database) -> Result<(), AppError> {
    for ddl in [
        create_table::<Author>(db.backend()),
        create_table::<Book>(db.backend()),
        create_table::<Food>(db.backend()),
    ] {
        tracing::debug!(sql = %ddl, "schema");
        sqlx::query(&ddl).execute(db.pool()).await?;
    }
    tracing::info!("schema synchronized");
    Ok(())
}

fn type_str(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Text | ColumnKind::Enum(_) => "TEXT",
        ColumnKind::BigInt => "BIGINT",
    }
}

fn id_column(backend: Backend) -> &'static str {
    match backend {
        Backend::Postgres => "BIGSERIAL PRIMARY KEY",
        Backend::Sqlite => "INTEGER PRIMARY KEY AUTOINCREMENT",
    }
}

/// CREATE TABLE IF NOT EXISTS for one entity.
pub fn create_table<E: Entity>(backend: Backend) -> String {
    let mut col_defs = vec![format!("{} {}", quoted("id"), id_column(backend))];
    for c in E::COLUMNS {
        let mut def = format!("{} {}", quoted(c.name), type_str(c.kind));
        if !c.nullable {
            def.push_str(" NOT NULL");
        }
        if let ColumnKind::Enum(values) = c.kind {
            let values: Vec<String> = values.iter().map(|v| format!("'{}'", v.replace('\'', "''"))).collect();
            def.push_str(&format!(" CHECK ({} IN ({}))", quoted(c.name), values.join(", ")));
        }
        if let Some(r) = c.references {
            def.push_str(&format!(
                " REFERENCES {} ({}) ON DELETE SET NULL ON UPDATE CASCADE",
                quoted(r.table),
                quoted(r.column)
            ));
        }
        col_defs.push(def);
    }
    for name in ["created_at", "updated_at"] {
        col_defs.push(format!("{} TEXT NOT NULL", quoted(name)));
    }
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        quoted(E::TABLE),
        col_defs.join(",\n  ")
    )
}
