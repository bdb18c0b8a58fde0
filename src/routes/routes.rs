//! Defines routes for the upload demo API.
//!
//! ## Structure
//! - **Files**
//!   - `GET    /api/files`         : list files, newest first
//!   - `GET    /api/files/{id}`    : one file
//!   - `PATCH  /api/files/{id}`    : rename / retype
//!   - `DELETE /api/files/{id}`    : delete, returns new storage usage
//!   - `GET    /api/storage`       : used / total bytes
//!   - `GET    /blobs/{id}`        : preview payload
//!
//! - **Uploads**
//!   - `POST   /api/uploads`       : submit files (multipart)
//!   - `GET    /api/queue`         : upload queue
//!   - `DELETE /api/queue/{id}`    : remove (and cancel) a queue entry
//!   - `GET    /api/sessions[/{id}]`: upload sessions
//!
//! - **Users**: `GET|POST /api/users`, `GET|PATCH|DELETE /api/users/{id}`
//!
//! - **View**: `GET /api/view`, `POST /api/view/toggle`,
//!   `PUT /api/view/tab/{tab}`, `GET /api/notifications`

use crate::{
    constants::UPLOAD_BODY_LIMIT,
    handlers::{
        file_handlers::{delete_file, get_blob, get_file, get_storage, list_files, update_file},
        health_handlers::{healthz, readyz},
        upload_handlers::{
            get_session, list_queue, list_sessions, remove_queue_entry, upload_files,
        },
        user_handlers::{create_user, delete_user, get_user, list_users, update_user},
        view_handlers::{get_view, list_notifications, switch_tab, toggle_view_mode},
    },
    services::dropzone::Dropzone,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};

/// Build and return the router for the whole API.
///
/// The router carries shared state (`Dropzone`) to all handlers.
pub fn routes() -> Router<Dropzone> {
    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // files
        .route("/api/files", get(list_files))
        .route(
            "/api/files/{id}",
            get(get_file).patch(update_file).delete(delete_file),
        )
        .route("/api/storage", get(get_storage))
        .route("/blobs/{id}", get(get_blob))
        // uploads
        .route(
            "/api/uploads",
            post(upload_files).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route("/api/queue", get(list_queue))
        .route("/api/queue/{id}", delete(remove_queue_entry))
        .route("/api/sessions", get(list_sessions))
        .route("/api/sessions/{id}", get(get_session))
        // users
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        // view
        .route("/api/view", get(get_view))
        .route("/api/view/toggle", post(toggle_view_mode))
        .route("/api/view/tab/{tab}", put(switch_tab))
        .route("/api/notifications", get(list_notifications))
}
