//! Resource handlers: create, list, read, update, delete for any entity.

use crate::error::AppError;
use crate::model::Entity;
use crate::service::Collection;
use crate::store::Store;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

/// An id that is not an integer cannot name a record.
fn parse_id<E: Entity>(id_str: &str) -> Result<i64, AppError> {
    id_str.parse().map_err(|_| AppError::NotFound(E::RESOURCE))
}

fn json_body(body: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    body.map(|Json(v)| v)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

pub async fn create<E: Entity, S: Store<E>>(
    State(collection): State<Collection<E, S>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let record = collection.create(json_body(body)?).await?;
    tracing::info!(resource = E::RESOURCE, id = record.id(), "created");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list<E: Entity, S: Store<E>>(
    State(collection): State<Collection<E, S>>,
) -> Result<impl IntoResponse, AppError> {
    let records = collection.read(None).await?;
    Ok((StatusCode::OK, Json(records)))
}

pub async fn read<E: Entity, S: Store<E>>(
    State(collection): State<Collection<E, S>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id::<E>(&id_str)?;
    let record = collection
        .read(Some(id))
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound(E::RESOURCE))?;
    Ok((StatusCode::OK, Json(record)))
}

pub async fn update<E: Entity, S: Store<E>>(
    State(collection): State<Collection<E, S>>,
    Path(id_str): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id::<E>(&id_str)?;
    let record = collection
        .update(id, json_body(body))
        .await?
        .ok_or(AppError::NotFound(E::RESOURCE))?;
    tracing::info!(resource = E::RESOURCE, id, "updated");
    Ok((StatusCode::OK, Json(record)))
}

pub async fn delete<E: Entity, S: Store<E>>(
    State(collection): State<Collection<E, S>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id::<E>(&id_str)?;
    collection.delete(id).await?.ok_or(AppError::NotFound(E::RESOURCE))?;
    tracing::info!(resource = E::RESOURCE, id, "deleted");
    Ok(StatusCode::NO_CONTENT)
}
