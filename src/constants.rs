//! Fixed quotas and timing defaults.

use std::time::Duration;

/// Largest accepted file, in bytes (100 MiB).
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Total storage quota, in bytes (5 GB).
pub const STORAGE_QUOTA: u64 = 5_000_000_000;

/// Progress increment range, in percentage points.
pub const PROGRESS_DELTA_MIN: f64 = 5.0;
pub const PROGRESS_DELTA_MAX: f64 = 20.0;

/// Pause between progress steps.
pub const STEP_PAUSE_MIN: Duration = Duration::from_millis(50);
pub const STEP_PAUSE_MAX: Duration = Duration::from_millis(150);

/// Usage thresholds for the storage indicator, in percent.
pub const USAGE_WARNING_PERCENT: f64 = 60.0;
pub const USAGE_CRITICAL_PERCENT: f64 = 80.0;

/// Number of notifications kept for polling clients.
pub const NOTIFICATION_HISTORY: usize = 50;

/// Capacity of the upload event broadcast channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Fixture file names inside the seed directory.
pub const FILES_FIXTURE: &str = "files.json";
pub const SESSIONS_FIXTURE: &str = "uploadSessions.json";
pub const USERS_FIXTURE: &str = "users.json";

/// Request body cap for multipart uploads. Files above `MAX_FILE_SIZE` are
/// still read so they can be rejected individually.
pub const UPLOAD_BODY_LIMIT: usize = 1024 * 1024 * 1024;
