//! Request pipeline middleware: timestamping, logging and the panic handler.

use crate::error::ErrorBody;
use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use std::any::Any;
use std::time::Instant;

/// When the request entered the service. Inserted by [`timestamp`].
#[derive(Clone, Copy, Debug)]
pub struct RequestTime(pub DateTime<Utc>);

pub async fn timestamp(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(RequestTime(Utc::now()));
    next.run(req).await
}

/// Logs one line per request once the response is ready.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let received = req
        .extensions()
        .get::<RequestTime>()
        .map(|t| t.0)
        .unwrap_or_else(Utc::now);
    let started = Instant::now();
    let res = next.run(req).await;
    tracing::info!(
        %method,
        %path,
        timestamp = %received.to_rfc3339(),
        status = res.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );
    res
}

/// Global error handler: a panic inside a handler becomes a 500 carrying its message.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Internal Server Error".to_string()
    };
    tracing::error!(error = %message, "handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message))).into_response()
}
