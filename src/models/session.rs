//! Represents one accepted batch of files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// An upload session, created once per accepted batch.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    pub id: String,

    /// Names of the accepted files, in submission order.
    #[serde(default)]
    pub files: Vec<String>,

    pub start_time: DateTime<Utc>,

    /// Sum of accepted file sizes, in bytes.
    #[serde(default)]
    pub total_size: u64,

    /// Starts at zero. The upload flow does not advance it.
    #[serde(default)]
    pub completed_size: u64,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub files: Vec<String>,
    pub total_size: u64,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionPatch {
    pub files: Option<Vec<String>>,
    pub total_size: Option<u64>,
    pub completed_size: Option<u64>,
}

impl Record for UploadSession {
    type Draft = NewSession;
    type Patch = SessionPatch;

    const KIND: &'static str = "upload session";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewSession) -> Self {
        Self {
            id,
            files: draft.files,
            start_time: Utc::now(),
            total_size: draft.total_size,
            completed_size: 0,
        }
    }

    fn apply(&mut self, patch: SessionPatch) {
        if let Some(files) = patch.files {
            self.files = files;
        }
        if let Some(total_size) = patch.total_size {
            self.total_size = total_size;
        }
        if let Some(completed_size) = patch.completed_size {
            self.completed_size = completed_size;
        }
    }
}
