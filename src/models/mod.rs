//! Core data models for the upload demo.
//!
//! Persisted records (`FileRecord`, `UploadSession`, `User`) live in the
//! in-memory record stores and serialize as camelCase JSON, matching the
//! seed fixtures. Queue entries, storage figures, notifications and view
//! preferences are transient and only ever travel by value.

pub mod file;
pub mod notification;
pub mod queue;
pub mod session;
pub mod storage;
pub mod user;
pub mod view;

/// A record that can be kept in a `RecordStore`.
///
/// `Draft` is the caller-supplied part of a new record; the store assigns the
/// identifier and any defaulted fields. `Patch` is a shallow update: every
/// `Some` field overwrites, everything else is retained.
pub trait Record: Clone + Send + Sync + 'static {
    type Draft: Send + 'static;
    type Patch: Send + 'static;

    /// Human-readable record kind used in errors and logs.
    const KIND: &'static str;

    fn id(&self) -> &str;

    fn from_draft(id: String, draft: Self::Draft) -> Self;

    fn apply(&mut self, patch: Self::Patch);
}
