//! Entry point: middleware, resource routers, fallback, and the startup protocol.

use crate::config::Settings;
use crate::handlers::not_found;
use crate::middleware::{handle_panic, log_request, timestamp};
use crate::migration::sync_schema;
use crate::model::{Author, Book, Food};
use crate::routes::{common_routes, resource_routes};
use crate::service::Collection;
use crate::store::Database;
use axum::{middleware::from_fn, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, limit::RequestBodyLimitLayer};

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 100 * 1024;

/// Builds the full service around an already synchronized store.
///
/// Layers run outermost first: CORS, body limit, timestamp, logging, then the
/// panic handler directly around routing.
pub fn build_app(db: Arc<Database>) -> Router {
    Router::new()
        .merge(common_routes())
        .merge(resource_routes("/authors", Collection::<Author, _>::new(Arc::clone(&db))))
        .merge(resource_routes("/books", Collection::<Book, _>::new(Arc::clone(&db))))
        .merge(resource_routes("/food", Collection::<Food, _>::new(db)))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn(log_request))
        .layer(from_fn(timestamp))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(CorsLayer::permissive())
}

/// Connects, synchronizes the schema, and only then starts listening.
/// Any failure before the socket is bound is returned without serving.
pub async fn start(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        test_mode = settings.test_mode,
        backend = ?settings.database.backend,
        "starting"
    );
    let db = match connect_and_sync(settings).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!(error = %e, "Failed to sync database");
            return Err(e.into());
        }
    };

    let listener = TcpListener::bind(("0.0.0.0", settings.port)).await?;
    let port = listener.local_addr()?.port();
    match &settings.domain {
        Some(domain) => tracing::info!("Server is running at {}:{}", domain, port),
        None => tracing::info!("Server is running on port {}", port),
    }

    let app = build_app(Arc::clone(&db));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    db.close().await;
    Ok(())
}

async fn connect_and_sync(settings: &Settings) -> Result<Database, crate::error::AppError> {
    let db = Database::connect(&settings.database).await?;
    sync_schema(&db).await?;
    Ok(db)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
