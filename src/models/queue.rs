//! Transient upload-queue state. Nothing here is persisted to a store.

use bytes::Bytes;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Status of a queue entry.
///
/// Moves `pending → uploading → completed | error` and never regresses.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Pending,
    Uploading,
    Completed,
    Error,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, UploadStatus::Completed | UploadStatus::Error)
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_transition_to(self, next: UploadStatus) -> bool {
        matches!(
            (self, next),
            (UploadStatus::Pending, UploadStatus::Uploading)
                | (UploadStatus::Uploading, UploadStatus::Completed)
                | (UploadStatus::Uploading, UploadStatus::Error)
        )
    }
}

/// A file handed to the uploader: name, size, type and raw bytes.
///
/// `size` is authoritative. Oversized payloads may arrive with their bytes
/// already discarded.
#[derive(Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PendingFile {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip)]
    pub data: Bytes,
}

impl PendingFile {
    /// Build a pending file whose size is the payload length.
    pub fn new(name: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            size: data.len() as u64,
            content_type,
            data,
        }
    }

    /// Build a pending file with a declared size and no payload.
    pub fn sized(name: impl Into<String>, size: u64, content_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            size,
            content_type,
            data: Bytes::new(),
        }
    }
}

/// One visible row of the upload queue.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadQueueEntry {
    pub id: String,

    /// Session the entry was accepted under.
    pub session_id: String,

    pub file: PendingFile,

    /// Whole percent, 0 to 100.
    pub progress: u8,

    pub status: UploadStatus,

    /// Bytes per second, `None` while unknown.
    pub speed: Option<f64>,

    /// Seconds left, `None` while unknown or once finished.
    pub time_remaining: Option<f64>,

    /// Id of the file record created on completion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,

    #[serde(skip)]
    pub(crate) cancel: CancellationToken,
}

impl UploadQueueEntry {
    pub fn new(id: String, session_id: String, file: PendingFile) -> Self {
        Self {
            id,
            session_id,
            file,
            progress: 0,
            status: UploadStatus::Pending,
            speed: None,
            time_remaining: None,
            file_id: None,
            cancel: CancellationToken::new(),
        }
    }
}

/// A file excluded from a batch before any state was created for it.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum Rejection {
    OversizedFile { name: String, size: u64, limit: u64 },
}

/// Outcome of accepting a batch.
#[derive(Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchReceipt {
    /// `None` when nothing was accepted.
    pub session_id: Option<String>,

    /// Queue entry ids, in submission order.
    pub entry_ids: Vec<String>,

    pub rejected: Vec<Rejection>,
}
