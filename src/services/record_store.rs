//! src/services/record_store.rs
//!
//! RecordStore: an in-memory, ordered collection of records behind the
//! `Repository` interface. Each store owns its collection outright; every
//! read and write copies records in or out, so callers never hold a
//! reference into the store. Operations wait out an artificial latency
//! before touching the collection.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    models::{Record, file::FileRecord, session::UploadSession, user::User},
    services::{
        delay::{Latency, delay},
        ids::{IdGenerator, UuidIds},
    },
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} `{id}` not found")]
    RecordNotFound { kind: &'static str, id: String },
    #[error("{kind} store unavailable: {reason}")]
    Unavailable { kind: &'static str, reason: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD contract shared by every record store.
///
/// The in-memory implementation only ever fails with `RecordNotFound`;
/// other backends may also report `Unavailable`.
#[async_trait]
pub trait Repository<R: Record>: Send + Sync {
    /// Snapshot of the whole collection, newest first.
    async fn get_all(&self) -> StoreResult<Vec<R>>;

    /// Copy of the record with `id`, or `None`.
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<R>>;

    /// Assign a fresh id and defaults, prepend, and return the stored record.
    async fn create(&self, draft: R::Draft) -> StoreResult<R>;

    /// Shallow-merge `patch` into the record with `id`.
    async fn update(&self, id: &str, patch: R::Patch) -> StoreResult<R>;

    /// Remove the first record with `id` and return it.
    async fn delete(&self, id: &str) -> StoreResult<R>;
}

pub type FileStore = RecordStore<FileRecord>;
pub type SessionStore = RecordStore<UploadSession>;
pub type UserStore = RecordStore<User>;

/// In-memory `Repository` backed by a vector.
///
/// Concurrent writers are not coordinated beyond the lock around each
/// individual mutation: the last write to an id wins.
pub struct RecordStore<R: Record> {
    records: Arc<RwLock<Vec<R>>>,
    ids: Arc<dyn IdGenerator>,
    latency: Latency,
}

impl<R: Record> Clone for RecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            ids: self.ids.clone(),
            latency: self.latency,
        }
    }
}

impl<R: Record> RecordStore<R> {
    /// Create an empty store.
    pub fn new(ids: Arc<dyn IdGenerator>, latency: Latency) -> Self {
        Self::with_records(Vec::new(), ids, latency)
    }

    /// Create a store preloaded with `records`, kept in the given order.
    pub fn with_records(records: Vec<R>, ids: Arc<dyn IdGenerator>, latency: Latency) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            ids,
            latency,
        }
    }

    /// Number of records, without simulated latency.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn not_found(id: &str) -> StoreError {
        StoreError::RecordNotFound {
            kind: R::KIND,
            id: id.to_string(),
        }
    }

    /// Draw ids until one is unused. Seeded records may carry arbitrary ids.
    fn fresh_id(&self, records: &[R]) -> String {
        loop {
            let id = self.ids.next_id();
            if !records.iter().any(|r| r.id() == id) {
                return id;
            }
            debug!(kind = R::KIND, %id, "generated id already in use, drawing again");
        }
    }
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new(Arc::new(UuidIds), Latency::none())
    }
}

#[async_trait]
impl<R: Record> Repository<R> for RecordStore<R> {
    async fn get_all(&self) -> StoreResult<Vec<R>> {
        delay(self.latency.get_all).await;
        Ok(self.records.read().await.clone())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<R>> {
        delay(self.latency.get_by_id).await;
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        delay(self.latency.create).await;
        let mut records = self.records.write().await;
        let id = self.fresh_id(&records);
        let record = R::from_draft(id, draft);
        records.insert(0, record.clone());
        debug!(kind = R::KIND, id = record.id(), "record created");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: R::Patch) -> StoreResult<R> {
        delay(self.latency.update).await;
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        record.apply(patch);
        Ok(record.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<R> {
        delay(self.latency.delete).await;
        let mut records = self.records.write().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| Self::not_found(id))?;
        let removed = records.remove(index);
        debug!(kind = R::KIND, %id, "record deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        file::{FilePatch, NewFile},
        session::NewSession,
        user::NewUser,
    };
    use crate::services::ids::SequentialIds;
    use chrono::Utc;
    use std::collections::HashSet;

    fn file_store() -> FileStore {
        RecordStore::new(Arc::new(SequentialIds::new("f")), Latency::none())
    }

    fn draft(name: &str, size: u64) -> NewFile {
        NewFile {
            name: name.into(),
            size,
            content_type: Some("text/plain".into()),
            url: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_by_id_round_trips() {
        let store = file_store();
        let created = store.create(draft("a.txt", 10)).await.unwrap();
        let fetched = store.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn create_prepends() {
        let store = file_store();
        let first = store.create(draft("first", 1)).await.unwrap();
        let second = store.create(draft("second", 2)).await.unwrap();
        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let store = file_store();
        let mut seen = HashSet::new();
        for i in 0..20 {
            let record = store.create(draft(&format!("f{i}"), i)).await.unwrap();
            assert!(seen.insert(record.id));
        }
    }

    #[tokio::test]
    async fn create_skips_ids_taken_by_seed_records() {
        let seeded = FileRecord::from_draft("f-1".into(), draft("seeded", 5));
        let store = RecordStore::with_records(
            vec![seeded],
            Arc::new(SequentialIds::new("f")),
            Latency::none(),
        );
        let created = store.create(draft("new", 1)).await.unwrap();
        assert_eq!(created.id, "f-2");
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn get_by_id_missing_is_none() {
        let store = file_store();
        assert_eq!(store.get_by_id("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn snapshots_are_isolated_from_the_store() {
        let store = file_store();
        let created = store.create(draft("a", 1)).await.unwrap();

        let mut snapshot = store.get_all().await.unwrap();
        snapshot[0].name = "mutated".into();
        snapshot.clear();

        let stored = store.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "a");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn update_merges_supplied_fields_only() {
        let store = file_store();
        let created = store.create(draft("a.txt", 42)).await.unwrap();
        let updated = store
            .update(
                &created.id,
                FilePatch {
                    name: Some("b.txt".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "b.txt");
        assert_eq!(updated.size, 42);
        assert_eq!(updated.content_type.as_deref(), Some("text/plain"));
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.upload_date, created.upload_date);
    }

    #[tokio::test]
    async fn update_and_delete_missing_fail_with_not_found() {
        let store = file_store();
        let err = store.update("ghost", FilePatch::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound { kind: "file", .. }));
        let err = store.delete("ghost").await.unwrap_err();
        assert!(matches!(err, StoreError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let store = file_store();
        let created = store.create(draft("a", 1)).await.unwrap();
        let removed = store.delete(&created.id).await.unwrap();
        assert_eq!(removed, created);
        assert!(store.is_empty().await);
        assert!(matches!(
            store.delete(&created.id).await,
            Err(StoreError::RecordNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn session_defaults() {
        let store: SessionStore = RecordStore::default();
        let before = Utc::now();
        let session = store
            .create(NewSession {
                files: vec!["a".into(), "b".into()],
                total_size: 30,
            })
            .await
            .unwrap();
        assert_eq!(session.completed_size, 0);
        assert_eq!(session.total_size, 30);
        assert!(session.start_time >= before);
    }

    #[tokio::test]
    async fn user_defaults() {
        let store: UserStore = RecordStore::default();
        let user = store
            .create(NewUser {
                name: Some("sam".into()),
                email: None,
            })
            .await
            .unwrap();
        assert_eq!(user.storage_used, 0);
        assert_eq!(user.storage_limit, 5_000_000_000);
        assert!(user.upload_history.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn operations_wait_out_their_latency() {
        let store: FileStore =
            RecordStore::new(Arc::new(SequentialIds::new("f")), Latency::files());
        let start = tokio::time::Instant::now();
        store.create(draft("a", 1)).await.unwrap();
        assert!(start.elapsed() >= Latency::files().create);
    }
}
