//! Store client: one connection pool shared by every resource, and the
//! capability trait the collections are written against.

use crate::config::{Backend, DatabaseSettings};
use crate::error::AppError;
use crate::model::Entity;
use crate::sql::{self, bind_all, QueryBuf};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;

/// CRUD capability over one entity type. The store is the only writer of
/// record state and the sole arbiter of concurrent writes.
#[async_trait]
pub trait Store<E: Entity>: Send + Sync + 'static {
    async fn create(&self, new: &E::New) -> Result<E, AppError>;
    async fn find_all(&self) -> Result<Vec<E>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError>;
    /// Persists every field of `record`. `None` when the row vanished meanwhile.
    async fn update(&self, record: &E) -> Result<Option<E>, AppError>;
    /// Removes the row and returns its prior state, or `None` if absent.
    async fn delete(&self, id: i64) -> Result<Option<E>, AppError>;
}

/// Relational store reached through sqlx's runtime-selected driver.
#[derive(Clone)]
pub struct Database {
    pool: AnyPool,
    backend: Backend,
}

impl Database {
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, AppError> {
        sqlx::any::install_default_drivers();
        let mut options = AnyPoolOptions::new().max_connections(settings.max_connections);
        if settings.is_in_memory() {
            // The database lives exactly as long as its only connection.
            options = options
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>);
        }
        let pool = options.connect(&settings.connect_url()).await?;
        tracing::info!(backend = ?settings.backend, "connected to store");
        Ok(Database {
            pool,
            backend: settings.backend,
        })
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("store connection closed");
    }

    async fn fetch_optional<E: Entity>(&self, q: &QueryBuf) -> Result<Option<E>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_all(sqlx::query(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(E::from_row).transpose()?)
    }

    async fn fetch_all<E: Entity>(&self, q: &QueryBuf) -> Result<Vec<E>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let rows = bind_all(sqlx::query(&q.sql), &q.params).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(E::from_row).collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl<E: Entity> Store<E> for Database {
    async fn create(&self, new: &E::New) -> Result<E, AppError> {
        let q = sql::insert::<E>(self.backend, E::new_values(new), Utc::now());
        self.fetch_optional::<E>(&q)
            .await?
            .ok_or(AppError::Store(sqlx::Error::RowNotFound))
    }

    async fn find_all(&self) -> Result<Vec<E>, AppError> {
        self.fetch_all::<E>(&sql::select_all::<E>(self.backend)).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<E>, AppError> {
        self.fetch_optional::<E>(&sql::select_by_id::<E>(self.backend, id)).await
    }

    async fn update(&self, record: &E) -> Result<Option<E>, AppError> {
        let q = sql::update::<E>(self.backend, record.id(), record.values(), Utc::now());
        self.fetch_optional::<E>(&q).await
    }

    async fn delete(&self, id: i64) -> Result<Option<E>, AppError> {
        self.fetch_optional::<E>(&sql::delete::<E>(self.backend, id)).await
    }
}
