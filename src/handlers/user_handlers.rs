//! HTTP handlers for user accounts.

use crate::{
    errors::AppError,
    models::user::{NewUser, User, UserPatch},
    services::{dropzone::Dropzone, record_store::Repository},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

/// `GET /api/users`
pub async fn list_users(State(app): State<Dropzone>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(app.users().get_all().await?))
}

/// `GET /api/users/{id}`
pub async fn get_user(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    app.users()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("user `{}` not found", id)))
}

/// `POST /api/users`
pub async fn create_user(
    State(app): State<Dropzone>,
    Json(draft): Json<NewUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = app.users().create(draft).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PATCH /api/users/{id}`
pub async fn update_user(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<User>, AppError> {
    Ok(Json(app.users().update(&id, patch).await?))
}

/// `DELETE /api/users/{id}`
pub async fn delete_user(
    State(app): State<Dropzone>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    app.users().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
