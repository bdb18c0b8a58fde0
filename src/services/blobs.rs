//! In-memory payloads behind `blob:` preview urls.

use std::{collections::HashMap, sync::Arc};

use bytes::Bytes;
use tokio::sync::RwLock;
use uuid::Uuid;

const BLOB_SCHEME: &str = "blob:";

#[derive(Clone, Debug)]
pub struct Blob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Registry of payloads addressed by `blob:<uuid>` urls.
///
/// Entries live until revoked or until the process exits.
#[derive(Clone, Default)]
pub struct BlobRegistry {
    blobs: Arc<RwLock<HashMap<String, Blob>>>,
}

impl BlobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `data` and return the url that refers to it.
    pub async fn register(&self, data: Bytes, content_type: Option<String>) -> String {
        let key = Uuid::new_v4().to_string();
        self.blobs
            .write()
            .await
            .insert(key.clone(), Blob { data, content_type });
        format!("{BLOB_SCHEME}{key}")
    }

    /// Look up by full url (`blob:<id>`) or bare id.
    pub async fn get(&self, url: &str) -> Option<Blob> {
        self.blobs.read().await.get(Self::key(url)).cloned()
    }

    /// Drop the payload; returns whether anything was removed.
    pub async fn revoke(&self, url: &str) -> bool {
        self.blobs.write().await.remove(Self::key(url)).is_some()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    fn key(url: &str) -> &str {
        url.strip_prefix(BLOB_SCHEME).unwrap_or(url)
    }
}
