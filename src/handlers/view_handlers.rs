//! View preferences and notifications for the front end.

use crate::{
    errors::AppError,
    models::{
        notification::Notification,
        view::{Tab, ViewState},
    },
    services::dropzone::Dropzone,
};
use axum::{
    Json,
    extract::{Path, State},
};

/// `GET /api/view`
pub async fn get_view(State(app): State<Dropzone>) -> Json<ViewState> {
    Json(app.view().await)
}

/// `POST /api/view/toggle`: flip between grid and list.
pub async fn toggle_view_mode(State(app): State<Dropzone>) -> Json<ViewState> {
    Json(app.toggle_view_mode().await)
}

/// `PUT /api/view/tab/{tab}`
pub async fn switch_tab(
    State(app): State<Dropzone>,
    Path(tab): Path<String>,
) -> Result<Json<ViewState>, AppError> {
    let tab: Tab = tab.parse().map_err(AppError::bad_request)?;
    Ok(Json(app.switch_tab(tab).await))
}

/// `GET /api/notifications`: recent notifications, oldest first.
pub async fn list_notifications(State(app): State<Dropzone>) -> Json<Vec<Notification>> {
    Json(app.notifications().await)
}
