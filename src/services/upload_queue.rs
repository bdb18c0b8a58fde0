//! src/services/upload_queue.rs
//!
//! UploadQueue: validates submitted files, opens an upload session per
//! batch, and drives each accepted file through a simulated transfer:
//! `pending → uploading → completed | error`. Completion creates a file
//! record; the visible queue keeps terminal entries until they are removed.
//!
//! Entries of one batch are processed strictly one at a time in submission
//! order, and batches run in the order they were submitted. Removing an
//! entry cancels its simulation, so a removed entry never creates a record.

use std::sync::Arc;

use thiserror::Error;
use tokio::{
    sync::{Mutex, RwLock, oneshot},
    task::JoinHandle,
    time::Instant,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    constants::MAX_FILE_SIZE,
    models::{
        file::{FileRecord, NewFile},
        queue::{BatchReceipt, PendingFile, Rejection, UploadQueueEntry, UploadStatus},
        session::{NewSession, UploadSession},
    },
    services::{
        accounting::storage_stats,
        blobs::BlobRegistry,
        delay::delay,
        ids::{IdGenerator, UuidIds},
        notifier::{Notifier, UploadEvent},
        progress::{self, ProgressStrategy, RandomProgress, Stepper},
        record_store::{Repository, StoreError},
    },
    utils::format_bytes,
};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("queue entry `{0}` not found")]
    EntryNotFound(String),
    #[error("failed to start upload session: {0}")]
    SessionCreateFailed(#[source] StoreError),
    #[error("failed to record upload of `{name}`: {source}")]
    UploadRecordCreateFailed {
        name: String,
        #[source]
        source: StoreError,
    },
}

pub type UploadResult<T> = Result<T, UploadError>;

/// A batch that has been accepted and handed to the background uploader.
pub struct SubmittedBatch {
    pub receipt: BatchReceipt,
    handle: Option<JoinHandle<()>>,
}

impl SubmittedBatch {
    /// Wait until every entry of the batch is terminal or cancelled.
    pub async fn wait(self) -> BatchReceipt {
        if let Some(handle) = self.handle {
            if let Err(err) = handle.await {
                warn!(error = %err, "upload batch task ended abnormally");
            }
        }
        self.receipt
    }
}

/// Split `files` into those within the size cap and per-file rejections.
pub fn validate_batch(files: Vec<PendingFile>) -> (Vec<PendingFile>, Vec<Rejection>) {
    let mut accepted = Vec::with_capacity(files.len());
    let mut rejected = Vec::new();
    for file in files {
        if file.size > MAX_FILE_SIZE {
            rejected.push(Rejection::OversizedFile {
                name: file.name,
                size: file.size,
                limit: MAX_FILE_SIZE,
            });
        } else {
            accepted.push(file);
        }
    }
    (accepted, rejected)
}

#[derive(Clone)]
pub struct UploadQueue {
    entries: Arc<RwLock<Vec<UploadQueueEntry>>>,
    files: Arc<dyn Repository<FileRecord>>,
    sessions: Arc<dyn Repository<UploadSession>>,
    strategy: Arc<dyn ProgressStrategy>,
    ids: Arc<dyn IdGenerator>,
    blobs: BlobRegistry,
    notifier: Notifier,
    /// Completion signal of the most recently submitted batch.
    tail: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
}

impl UploadQueue {
    pub fn new(
        files: Arc<dyn Repository<FileRecord>>,
        sessions: Arc<dyn Repository<UploadSession>>,
        blobs: BlobRegistry,
        notifier: Notifier,
    ) -> Self {
        Self {
            entries: Arc::new(RwLock::new(Vec::new())),
            files,
            sessions,
            strategy: Arc::new(RandomProgress::default()),
            ids: Arc::new(UuidIds),
            blobs,
            notifier,
            tail: Arc::new(Mutex::new(None)),
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

    /// Snapshot of the visible queue, in submission order.
    pub async fn entries(&self) -> Vec<UploadQueueEntry> {
        self.entries.read().await.clone()
    }

    pub async fn entry(&self, id: &str) -> Option<UploadQueueEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    /// Validate, open a session and start uploading the accepted files.
    ///
    /// Oversized files are reported individually and skipped. A batch with
    /// nothing accepted does nothing else. If the session cannot be created
    /// the whole batch is abandoned.
    pub async fn submit_files(&self, files: Vec<PendingFile>) -> UploadResult<SubmittedBatch> {
        let (accepted, rejected) = validate_batch(files);
        for rejection in &rejected {
            let Rejection::OversizedFile { name, size, .. } = rejection;
            debug!(%name, size, "file rejected");
            self.notifier
                .error(format!(
                    "File {} is too large (max {})",
                    name,
                    format_bytes(MAX_FILE_SIZE)
                ))
                .await;
        }

        if accepted.is_empty() {
            return Ok(SubmittedBatch {
                receipt: BatchReceipt {
                    session_id: None,
                    entry_ids: Vec::new(),
                    rejected,
                },
                handle: None,
            });
        }

        let total_size = accepted
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.size));
        let draft = NewSession {
            files: accepted.iter().map(|f| f.name.clone()).collect(),
            total_size,
        };
        let session = match self.sessions.create(draft).await {
            Ok(session) => session,
            Err(err) => {
                self.notifier.error("Failed to start upload session").await;
                return Err(UploadError::SessionCreateFailed(err));
            }
        };

        let new_entries: Vec<UploadQueueEntry> = accepted
            .into_iter()
            .map(|file| UploadQueueEntry::new(self.ids.next_id(), session.id.clone(), file))
            .collect();
        let entry_ids: Vec<String> = new_entries.iter().map(|e| e.id.clone()).collect();
        self.entries.write().await.extend(new_entries);
        for id in &entry_ids {
            self.notifier.publish(UploadEvent::Queued {
                entry_id: id.clone(),
                session_id: session.id.clone(),
            });
        }
        info!(
            session_id = %session.id,
            files = entry_ids.len(),
            total_size,
            "upload batch accepted"
        );

        let (done_tx, done_rx) = oneshot::channel();
        let previous = self.tail.lock().await.replace(done_rx);
        let queue = self.clone();
        let ids = entry_ids.clone();
        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            for id in &ids {
                queue.simulate(id).await;
            }
            let _ = done_tx.send(());
        });

        Ok(SubmittedBatch {
            receipt: BatchReceipt {
                session_id: Some(session.id),
                entry_ids,
                rejected,
            },
            handle: Some(handle),
        })
    }

    /// Remove an entry from the visible queue, cancelling it if in flight.
    pub async fn remove_entry(&self, id: &str) -> UploadResult<UploadQueueEntry> {
        let removed = {
            let mut entries = self.entries.write().await;
            let index = entries
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| UploadError::EntryNotFound(id.to_string()))?;
            entries.remove(index)
        };
        if !removed.status.is_terminal() {
            removed.cancel.cancel();
            debug!(entry_id = %id, "in-flight upload cancelled");
        }
        self.notifier.publish(UploadEvent::Removed {
            entry_id: id.to_string(),
        });
        Ok(removed)
    }

    /// Drive one entry to a terminal state.
    async fn simulate(&self, entry_id: &str) {
        let Some((file, cancel)) = self.begin(entry_id).await else {
            return;
        };

        let mut stepper = Stepper::new(self.strategy.plan(&file));
        let started = Instant::now();
        while let Some((progress, pause)) = stepper.advance() {
            let elapsed = started.elapsed();
            self.record_progress(
                entry_id,
                progress,
                progress::speed(file.size, progress, elapsed),
                progress::time_remaining(progress, elapsed),
            )
            .await;
            if stepper.is_done() {
                break;
            }
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.cancelled(entry_id);
                    return;
                }
                _ = delay(pause) => {}
            }
        }

        let url = self
            .blobs
            .register(file.data.clone(), file.content_type.clone())
            .await;
        let draft = NewFile {
            name: file.name.clone(),
            size: file.size,
            content_type: file.content_type.clone(),
            url: Some(url.clone()),
        };
        let created = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.blobs.revoke(&url).await;
                self.cancelled(entry_id);
                return;
            }
            created = self.files.create(draft) => created,
        };

        match created {
            Ok(record) => self.complete(entry_id, &file, record).await,
            Err(source) => {
                self.blobs.revoke(&url).await;
                let err = UploadError::UploadRecordCreateFailed {
                    name: file.name.clone(),
                    source,
                };
                self.fail(entry_id, &file, err).await;
            }
        }
    }

    /// Move a pending entry to `uploading`; `None` if it is gone or cancelled.
    async fn begin(&self, entry_id: &str) -> Option<(PendingFile, CancellationToken)> {
        let mut entries = self.entries.write().await;
        let entry = entries.iter_mut().find(|e| e.id == entry_id)?;
        if entry.cancel.is_cancelled()
            || !entry.status.can_transition_to(UploadStatus::Uploading)
        {
            return None;
        }
        entry.status = UploadStatus::Uploading;
        debug!(%entry_id, name = %entry.file.name, "upload started");
        Some((entry.file.clone(), entry.cancel.clone()))
    }

    async fn record_progress(
        &self,
        entry_id: &str,
        progress: f64,
        speed: Option<f64>,
        time_remaining: Option<f64>,
    ) {
        let event = {
            let mut entries = self.entries.write().await;
            let Some(entry) = entries.iter_mut().find(|e| e.id == entry_id) else {
                return;
            };
            if entry.status != UploadStatus::Uploading {
                return;
            }
            entry.progress = entry.progress.max(progress.round().clamp(0.0, 100.0) as u8);
            entry.speed = speed;
            entry.time_remaining = time_remaining;
            UploadEvent::Progress {
                entry_id: entry_id.to_string(),
                progress: entry.progress,
                status: entry.status,
                speed,
                time_remaining,
            }
        };
        self.notifier.publish(event);
    }

    async fn complete(&self, entry_id: &str, file: &PendingFile, record: FileRecord) {
        let applied = self
            .finish(entry_id, UploadStatus::Completed, |entry| {
                entry.progress = 100;
                entry.time_remaining = None;
                entry.file_id = Some(record.id.clone());
            })
            .await;
        if applied {
            info!(%entry_id, file_id = %record.id, size = file.size, "upload completed");
            self.notifier.publish(UploadEvent::Completed {
                entry_id: entry_id.to_string(),
                file_id: record.id.clone(),
            });
            self.notifier
                .success(format!("{} uploaded successfully", file.name))
                .await;
        } else {
            debug!(%entry_id, file_id = %record.id, "entry removed before completion was recorded");
        }

        match self.files.get_all().await {
            Ok(files) => self
                .notifier
                .publish(UploadEvent::StorageChanged(storage_stats(&files))),
            Err(err) => warn!(error = %err, "could not refresh storage usage"),
        }
    }

    async fn fail(&self, entry_id: &str, file: &PendingFile, err: UploadError) {
        warn!(%entry_id, error = %err, "upload failed");
        if !self.finish(entry_id, UploadStatus::Error, |_| {}).await {
            return;
        }
        self.notifier.publish(UploadEvent::Failed {
            entry_id: entry_id.to_string(),
            reason: err.to_string(),
        });
        self.notifier
            .error(format!("Failed to upload {}", file.name))
            .await;
    }

    /// Apply a terminal transition; `false` if the entry is gone.
    async fn finish(
        &self,
        entry_id: &str,
        status: UploadStatus,
        update: impl FnOnce(&mut UploadQueueEntry),
    ) -> bool {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) if entry.status.can_transition_to(status) => {
                entry.status = status;
                update(entry);
                true
            }
            _ => false,
        }
    }

    fn cancelled(&self, entry_id: &str) {
        debug!(%entry_id, "upload stopped after removal");
        self.notifier.publish(UploadEvent::Cancelled {
            entry_id: entry_id.to_string(),
        });
    }
}
