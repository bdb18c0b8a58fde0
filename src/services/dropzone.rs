//! src/services/dropzone.rs
//!
//! Dropzone: the application state behind the HTTP surface. It owns the
//! three record stores, the upload queue, the blob registry, notifications
//! and view preferences, and implements the user-facing actions: submit
//! files, remove a queue entry, delete a file, toggle the view mode and
//! switch tabs.

use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use tracing::info;

use crate::{
    models::{
        file::{FilePatch, FileRecord},
        notification::Notification,
        queue::{PendingFile, UploadQueueEntry},
        session::UploadSession,
        storage::StorageStats,
        view::{Tab, ViewState},
    },
    seed::Seed,
    services::{
        accounting::storage_stats,
        blobs::BlobRegistry,
        delay::Latency,
        ids::{IdGenerator, UuidIds},
        notifier::{Notifier, UploadEvent},
        progress::{ProgressStrategy, RandomProgress},
        record_store::{
            FileStore, RecordStore, Repository, SessionStore, StoreResult, UserStore,
        },
        upload_queue::{SubmittedBatch, UploadQueue, UploadResult},
    },
};

/// Timing and identity knobs for a `Dropzone`.
#[derive(Clone)]
pub struct DropzoneOptions {
    /// Apply the per-store artificial latency.
    pub latency: bool,
    pub strategy: Arc<dyn ProgressStrategy>,
    pub ids: Arc<dyn IdGenerator>,
}

impl DropzoneOptions {
    /// Store latency and randomized stepping with pauses.
    pub fn realtime() -> Self {
        Self {
            latency: true,
            strategy: Arc::new(RandomProgress::default()),
            ids: Arc::new(UuidIds),
        }
    }

    /// No latency and no pauses.
    pub fn instant() -> Self {
        Self {
            latency: false,
            strategy: Arc::new(RandomProgress::instant()),
            ids: Arc::new(UuidIds),
        }
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn ProgressStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }
}

impl Default for DropzoneOptions {
    fn default() -> Self {
        Self::realtime()
    }
}

#[derive(Clone)]
pub struct Dropzone {
    files: FileStore,
    sessions: SessionStore,
    users: UserStore,
    queue: UploadQueue,
    blobs: BlobRegistry,
    notifier: Notifier,
    view: Arc<RwLock<ViewState>>,
}

impl Dropzone {
    pub fn new(seed: Seed, options: DropzoneOptions) -> Self {
        let latency = |profile: Latency| {
            if options.latency {
                profile
            } else {
                Latency::none()
            }
        };
        let files =
            RecordStore::with_records(seed.files, options.ids.clone(), latency(Latency::files()));
        let sessions = RecordStore::with_records(
            seed.sessions,
            options.ids.clone(),
            latency(Latency::sessions()),
        );
        let users =
            RecordStore::with_records(seed.users, options.ids.clone(), latency(Latency::users()));
        Self::with_stores(files, sessions, users, options)
    }

    /// Assemble from pre-built stores.
    pub fn with_stores(
        files: FileStore,
        sessions: SessionStore,
        users: UserStore,
        options: DropzoneOptions,
    ) -> Self {
        let blobs = BlobRegistry::new();
        let notifier = Notifier::new();
        let queue = UploadQueue::new(
            Arc::new(files.clone()),
            Arc::new(sessions.clone()),
            blobs.clone(),
            notifier.clone(),
        )
        .with_strategy(options.strategy)
        .with_ids(options.ids);
        Self {
            files,
            sessions,
            users,
            queue,
            blobs,
            notifier,
            view: Arc::new(RwLock::new(ViewState::default())),
        }
    }

    pub fn files(&self) -> &FileStore {
        &self.files
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    pub fn blobs(&self) -> &BlobRegistry {
        &self.blobs
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.notifier.subscribe()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifier.recent().await
    }

    /// Accept a batch of dropped or browsed files.
    ///
    /// When anything was accepted the queue tab becomes active.
    pub async fn submit_files(&self, files: Vec<PendingFile>) -> UploadResult<SubmittedBatch> {
        let batch = self.queue.submit_files(files).await?;
        if batch.receipt.session_id.is_some() {
            self.switch_tab(Tab::Queue).await;
        }
        Ok(batch)
    }

    pub async fn remove_queue_entry(&self, id: &str) -> UploadResult<UploadQueueEntry> {
        self.queue.remove_entry(id).await
    }

    pub async fn queue_entries(&self) -> Vec<UploadQueueEntry> {
        self.queue.entries().await
    }

    pub async fn list_files(&self) -> StoreResult<Vec<FileRecord>> {
        self.files.get_all().await
    }

    pub async fn get_file(&self, id: &str) -> StoreResult<Option<FileRecord>> {
        self.files.get_by_id(id).await
    }

    pub async fn update_file(&self, id: &str, patch: FilePatch) -> StoreResult<FileRecord> {
        self.files.update(id, patch).await
    }

    /// Delete a file record, release its preview and return the new usage.
    pub async fn delete_file(&self, id: &str) -> StoreResult<StorageStats> {
        let removed = match self.files.delete(id).await {
            Ok(removed) => removed,
            Err(err) => {
                self.notifier.error("Failed to delete file").await;
                return Err(err);
            }
        };
        if let Some(url) = removed.url.as_deref() {
            self.blobs.revoke(url).await;
        }
        info!(file_id = %id, size = removed.size, "file deleted");
        self.notifier.publish(UploadEvent::FileDeleted {
            file_id: id.to_string(),
        });
        self.notifier.success("File deleted successfully").await;

        let stats = self.storage_stats().await?;
        self.notifier
            .publish(UploadEvent::StorageChanged(stats.clone()));
        Ok(stats)
    }

    pub async fn storage_stats(&self) -> StoreResult<StorageStats> {
        let files = self.files.get_all().await?;
        Ok(storage_stats(&files))
    }

    pub async fn list_sessions(&self) -> StoreResult<Vec<UploadSession>> {
        self.sessions.get_all().await
    }

    pub async fn get_session(&self, id: &str) -> StoreResult<Option<UploadSession>> {
        self.sessions.get_by_id(id).await
    }

    pub async fn view(&self) -> ViewState {
        *self.view.read().await
    }

    pub async fn toggle_view_mode(&self) -> ViewState {
        let mut view = self.view.write().await;
        view.view_mode = view.view_mode.toggled();
        *view
    }

    pub async fn switch_tab(&self, tab: Tab) -> ViewState {
        let mut view = self.view.write().await;
        view.active_tab = tab;
        *view
    }
}
