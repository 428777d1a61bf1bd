//! Factory CRUD + regenerate handlers.
//!
//! GET    /factories               — list all factories with children
//! POST   /factories               — create factory, generate initial children
//! GET    /factories/:id           — single factory with children
//! PATCH  /factories/:id           — update name/bounds (bounds change regenerates)
//! DELETE /factories/:id           — delete factory (children cascade)
//! POST   /factories/:id/generate  — redraw the child set

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::de::DeserializeOwned;

use factories_core::error::FactoryError;
use factories_core::proto::{CreateFactoryRequest, RegenerateRequest, UpdateFactoryRequest};
use factories_core::service::FactoryService;
use factories_core::types::FactoryWithChildren;

use crate::error::AppError;

/// Decode a request body, treating an empty or malformed body as `{}`.
/// A well-formed body with wrong field types (e.g. a fractional bound)
/// is a validation error, not a parse error.
fn decode_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, FactoryError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).unwrap_or_else(|_| serde_json::json!({}));
    serde_json::from_value(value)
        .map_err(|e| FactoryError::InvalidInput(format!("invalid request body: {e}")))
}

pub async fn list(
    Extension(service): Extension<Arc<dyn FactoryService>>,
) -> Result<Json<Vec<FactoryWithChildren>>, AppError> {
    Ok(Json(service.list().await?))
}

pub async fn create(
    Extension(service): Extension<Arc<dyn FactoryService>>,
    body: Bytes,
) -> Result<(StatusCode, Json<FactoryWithChildren>), AppError> {
    let req: CreateFactoryRequest = decode_body(&body)?;
    let created = service.create(req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    Extension(service): Extension<Arc<dyn FactoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<FactoryWithChildren>, AppError> {
    Ok(Json(service.get(id).await?))
}

pub async fn update(
    Extension(service): Extension<Arc<dyn FactoryService>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<FactoryWithChildren>, AppError> {
    let req: UpdateFactoryRequest = decode_body(&body)?;
    Ok(Json(service.update(id, req).await?))
}

pub async fn delete(
    Extension(service): Extension<Arc<dyn FactoryService>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    service.delete(id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

pub async fn regenerate(
    Extension(service): Extension<Arc<dyn FactoryService>>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<FactoryWithChildren>, AppError> {
    let req: RegenerateRequest = decode_body(&body)?;
    Ok(Json(service.regenerate(id, req).await?))
}
