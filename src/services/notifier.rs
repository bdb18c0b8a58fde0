//! User-facing notifications and the upload event stream.
//!
//! Every state change the front end should re-render for is published as an
//! `UploadEvent`. Notifications are also kept in a short history so polling
//! clients can catch up.

use std::{collections::VecDeque, sync::Arc};

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};
use tracing::{info, warn};

use crate::{
    constants::{EVENT_CHANNEL_CAPACITY, NOTIFICATION_HISTORY},
    models::{
        notification::{Notification, NotificationLevel},
        queue::UploadStatus,
        storage::StorageStats,
    },
};

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase", tag = "event")]
pub enum UploadEvent {
    #[serde(rename_all = "camelCase")]
    Queued { entry_id: String, session_id: String },
    #[serde(rename_all = "camelCase")]
    Progress {
        entry_id: String,
        progress: u8,
        status: UploadStatus,
        speed: Option<f64>,
        time_remaining: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Completed { entry_id: String, file_id: String },
    #[serde(rename_all = "camelCase")]
    Failed { entry_id: String, reason: String },
    #[serde(rename_all = "camelCase")]
    Cancelled { entry_id: String },
    #[serde(rename_all = "camelCase")]
    Removed { entry_id: String },
    #[serde(rename_all = "camelCase")]
    FileDeleted { file_id: String },
    StorageChanged(StorageStats),
    Notice(Notification),
}

#[derive(Clone)]
pub struct Notifier {
    events: broadcast::Sender<UploadEvent>,
    history: Arc<RwLock<VecDeque<Notification>>>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            events,
            history: Arc::new(RwLock::new(VecDeque::with_capacity(NOTIFICATION_HISTORY))),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UploadEvent> {
        self.events.subscribe()
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn publish(&self, event: UploadEvent) {
        let _ = self.events.send(event);
    }

    pub async fn success(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Success, message.into()).await;
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.notify(NotificationLevel::Error, message.into()).await;
    }

    /// Most recent notifications, oldest first.
    pub async fn recent(&self) -> Vec<Notification> {
        self.history.read().await.iter().cloned().collect()
    }

    async fn notify(&self, level: NotificationLevel, message: String) {
        match level {
            NotificationLevel::Error => warn!(%message, "notification"),
            NotificationLevel::Success => info!(%message, "notification"),
        }
        let notification = Notification::new(level, message);
        {
            let mut history = self.history.write().await;
            if history.len() == NOTIFICATION_HISTORY {
                history.pop_front();
            }
            history.push_back(notification.clone());
        }
        self.publish(UploadEvent::Notice(notification));
    }
}
