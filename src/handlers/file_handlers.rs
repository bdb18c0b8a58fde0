//! HTTP handlers for the file gallery, storage usage and blob previews.

use crate::{
    errors::AppError,
    models::{
        file::{FilePatch, FileRecord},
        storage::StorageStats,
    },
    services::dropzone::Dropzone,
    utils::format_bytes,
};
use axum::{
    Json,
    body::Body,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Storage figures plus their display strings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageResponse {
    #[serde(flatten)]
    pub stats: StorageStats,
    pub used_display: String,
    pub total_display: String,
}

impl From<StorageStats> for StorageResponse {
    fn from(stats: StorageStats) -> Self {
        Self {
            used_display: format_bytes(stats.used),
            total_display: format_bytes(stats.total),
            stats,
        }
    }
}

/// `GET /api/files`: every file, newest first.
pub async fn list_files(State(app): State<Dropzone>) -> Result<Json<Vec<FileRecord>>, AppError> {
    Ok(Json(app.list_files().await?))
}

/// `GET /api/files/{id}`
pub async fn get_file(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
) -> Result<Json<FileRecord>, AppError> {
    app.get_file(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("file `{}` not found", id)))
}

/// `PATCH /api/files/{id}`: shallow update of name, type or url.
pub async fn update_file(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
    Json(patch): Json<FilePatch>,
) -> Result<Json<FileRecord>, AppError> {
    Ok(Json(app.update_file(&id, patch).await?))
}

/// `DELETE /api/files/{id}`: returns the storage usage after deletion.
pub async fn delete_file(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
) -> Result<Json<StorageResponse>, AppError> {
    let stats = app.delete_file(&id).await?;
    Ok(Json(stats.into()))
}

/// `GET /api/storage`
pub async fn get_storage(State(app): State<Dropzone>) -> Result<Json<StorageResponse>, AppError> {
    Ok(Json(app.storage_stats().await?.into()))
}

/// `GET /blobs/{id}`: the payload behind a file's preview url.
pub async fn get_blob(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let blob = app
        .blobs()
        .get(&id)
        .await
        .ok_or_else(|| AppError::not_found(format!("blob `{}` not found", id)))?;

    let content_type = blob
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));

    let mut response = Response::new(Body::from(blob.data));
    *response.status_mut() = StatusCode::OK;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    Ok(response.into_response())
}
