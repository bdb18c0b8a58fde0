//! Artificial latency standing in for network and disk I/O.

use std::time::Duration;

/// Suspend for `duration`. Returns immediately for a zero duration.
pub async fn delay(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Per-operation latency of a record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Latency {
    pub get_all: Duration,
    pub get_by_id: Duration,
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

impl Latency {
    const fn millis(get_all: u64, get_by_id: u64, create: u64, update: u64, delete: u64) -> Self {
        Self {
            get_all: Duration::from_millis(get_all),
            get_by_id: Duration::from_millis(get_by_id),
            create: Duration::from_millis(create),
            update: Duration::from_millis(update),
            delete: Duration::from_millis(delete),
        }
    }

    /// No latency at all.
    pub const fn none() -> Self {
        Self::millis(0, 0, 0, 0, 0)
    }

    pub const fn files() -> Self {
        Self::millis(300, 200, 400, 300, 250)
    }

    pub const fn sessions() -> Self {
        Self::millis(250, 200, 300, 200, 250)
    }

    pub const fn users() -> Self {
        Self::millis(300, 200, 400, 300, 250)
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::none()
    }
}
