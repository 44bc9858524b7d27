//! Common routes: proof of life.

use crate::handlers::root;
use axum::{routing::get, Router};

/// GET / answers with a fixed text body.
pub fn common_routes() -> Router {
    Router::new().route("/", get(root))
}
