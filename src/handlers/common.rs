//! Proof-of-life and not-found handlers.

use crate::error::ErrorBody;
use axum::{http::StatusCode, response::IntoResponse, Json};

pub async fn root() -> impl IntoResponse {
    (StatusCode::OK, "Hello World")
}

/// Any unmatched path, or a method a resource path does not serve.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Not Found")))
}
