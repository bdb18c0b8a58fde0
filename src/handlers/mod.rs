//! HTTP handlers. Each delegates to `Dropzone` and maps errors through
//! `AppError`.

pub mod file_handlers;
pub mod health_handlers;
pub mod upload_handlers;
pub mod user_handlers;
pub mod view_handlers;
