//! Represents an account with its storage quota fields.

use serde::{Deserialize, Serialize};

use super::Record;
use crate::constants::STORAGE_QUOTA;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Bytes attributed to this user.
    #[serde(default)]
    pub storage_used: u64,

    /// Quota in bytes.
    #[serde(default = "default_storage_limit")]
    pub storage_limit: u64,

    /// Ids of past upload sessions.
    #[serde(default)]
    pub upload_history: Vec<String>,
}

fn default_storage_limit() -> u64 {
    STORAGE_QUOTA
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub storage_used: Option<u64>,
    pub storage_limit: Option<u64>,
    pub upload_history: Option<Vec<String>>,
}

impl Record for User {
    type Draft = NewUser;
    type Patch = UserPatch;

    const KIND: &'static str = "user";

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: String, draft: NewUser) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
            storage_used: 0,
            storage_limit: STORAGE_QUOTA,
            upload_history: Vec::new(),
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = Some(name);
        }
        if let Some(email) = patch.email {
            self.email = Some(email);
        }
        if let Some(storage_used) = patch.storage_used {
            self.storage_used = storage_used;
        }
        if let Some(storage_limit) = patch.storage_limit {
            self.storage_limit = storage_limit;
        }
        if let Some(upload_history) = patch.upload_history {
            self.upload_history = upload_history;
        }
    }
}
