//! HTTP handlers for submitting files, the upload queue and sessions.
//! Multipart bodies are read part by part; payloads above the size cap are
//! counted but not buffered.

use crate::{
    constants::MAX_FILE_SIZE,
    errors::AppError,
    models::{
        queue::{BatchReceipt, PendingFile, UploadQueueEntry},
        session::UploadSession,
    },
    services::dropzone::Dropzone,
    utils::{format_bytes, format_time},
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::BytesMut;
use serde::Serialize;

/// A queue entry plus display strings for its transfer figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryResponse {
    #[serde(flatten)]
    pub entry: UploadQueueEntry,
    /// `--` while unknown.
    pub speed_display: String,
    /// `m:ss`, `--` while unknown.
    pub time_remaining_display: String,
}

impl From<UploadQueueEntry> for QueueEntryResponse {
    fn from(entry: UploadQueueEntry) -> Self {
        let speed_display = match entry.speed {
            Some(speed) if speed.is_finite() && speed >= 0.0 => {
                format!("{}/s", format_bytes(speed.round() as u64))
            }
            _ => "--".to_string(),
        };
        Self {
            speed_display,
            time_remaining_display: format_time(entry.time_remaining),
            entry,
        }
    }
}

/// `POST /api/uploads`: one multipart part per file.
///
/// Responds `202 Accepted` when at least one file was queued and `200 OK`
/// when every file was rejected.
pub async fn upload_files(
    State(app): State<Dropzone>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut files = Vec::new();
    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);

        let mut size: u64 = 0;
        let mut data = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            size += chunk.len() as u64;
            if size <= MAX_FILE_SIZE {
                data.extend_from_slice(&chunk);
            } else if !data.is_empty() {
                data = BytesMut::new();
            }
        }

        files.push(PendingFile {
            name,
            size,
            content_type,
            data: data.freeze(),
        });
    }

    if files.is_empty() {
        return Err(AppError::bad_request("no files in request"));
    }

    let batch = app.submit_files(files).await?;
    let status = if batch.receipt.session_id.is_some() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::OK
    };
    Ok((status, Json::<BatchReceipt>(batch.receipt)))
}

/// `GET /api/queue`
pub async fn list_queue(State(app): State<Dropzone>) -> Json<Vec<QueueEntryResponse>> {
    Json(
        app.queue_entries()
            .await
            .into_iter()
            .map(QueueEntryResponse::from)
            .collect(),
    )
}

/// `DELETE /api/queue/{id}`: remove an entry, cancelling it if in flight.
pub async fn remove_queue_entry(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app.remove_queue_entry(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/sessions`
pub async fn list_sessions(
    State(app): State<Dropzone>,
) -> Result<Json<Vec<UploadSession>>, AppError> {
    Ok(Json(app.list_sessions().await?))
}

/// `GET /api/sessions/{id}`
pub async fn get_session(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
) -> Result<Json<UploadSession>, AppError> {
    app.get_session(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("upload session `{}` not found", id)))
}
