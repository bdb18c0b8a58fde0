//! filedrop: a drag-and-drop upload demo backed by in-memory stores.
//!
//! Uploads are simulated: accepted files step through a progress animation
//! and, on completion, become file records. Nothing is persisted beyond the
//! life of the process.

pub mod config;
pub mod constants;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod utils;
