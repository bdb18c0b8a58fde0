//! Stores, the upload simulator and the application facade.

pub mod accounting;
pub mod blobs;
pub mod delay;
pub mod dropzone;
pub mod ids;
pub mod notifier;
pub mod progress;
pub mod record_store;
pub mod upload_queue;
