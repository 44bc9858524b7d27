//! CRUD routes for one resource, mounted at a fixed collection path.
//! Unsupported methods on either path fall through to the global 404.

use crate::handlers::not_found;
use crate::handlers::resource::{create, delete, list, read, update};
use crate::model::Entity;
use crate::service::Collection;
use crate::store::Store;
use axum::{routing::get, Router};

pub fn resource_routes<E: Entity, S: Store<E>>(path: &str, collection: Collection<E, S>) -> Router {
    Router::new()
        .route(
            path,
            get(list::<E, S>).post(create::<E, S>).fallback(not_found),
        )
        .route(
            &format!("{}/:id", path),
            get(read::<E, S>)
                .put(update::<E, S>)
                .delete(delete::<E, S>)
                .fallback(not_found),
        )
        .with_state(collection)
}
