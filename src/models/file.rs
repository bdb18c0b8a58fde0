//! Represents a file that finished its simulated upload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// Lifecycle state of a stored file.
///
/// Only completed uploads ever become records; in-flight state lives on the
/// upload queue instead.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    #[default]
    Completed,
}

/// A single file in the gallery.
///
/// `id` and `size` are fixed at creation; the store never exposes a way to
/// change them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique identifier within the file store.
    pub id: String,

    /// Display name, not validated.
    pub name: String,

    /// Size in bytes. Fixtures without a size count as zero.
    #[serde(default)]
    pub size: u64,

    /// MIME-type-like string (e.g. `image/png`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// When the record was created.
    pub upload_date: DateTime<Utc>,

    #[serde(default)]
    pub status: FileStatus,

    /// Preview/download reference into the blob registry, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Caller-supplied fields for a new file record.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewFile {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Shallow update for a file record.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FilePatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub url: Option<String>,
}

impl Record for FileRecord {
    type Draft = NewFile;
    type Patch = FilePatch;

    const KIND: &'static str = "file";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewFile) -> Self {
        Self {
            id,
            name: draft.name,
            size: draft.size,
            content_type: draft.content_type,
            upload_date: Utc::now(),
            status: FileStatus::Completed,
            url: draft.url,
        }
    }

    fn apply(&mut self, patch: FilePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(content_type) = patch.content_type {
            self.content_type = Some(content_type);
        }
        if let Some(url) = patch.url {
            self.url = Some(url);
        }
    }
}
