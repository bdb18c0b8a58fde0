//! Storage accounting, recomputed from the file collection on demand.

use crate::{
    constants::{STORAGE_QUOTA, USAGE_CRITICAL_PERCENT, USAGE_WARNING_PERCENT},
    models::{
        file::FileRecord,
        storage::{StorageStats, UsageLevel},
    },
};

/// Used/total bytes for `files` against the fixed quota.
pub fn storage_stats(files: &[FileRecord]) -> StorageStats {
    let used = files.iter().fold(0u64, |acc, f| acc.saturating_add(f.size));
    stats_for(used, STORAGE_QUOTA)
}

pub fn stats_for(used: u64, total: u64) -> StorageStats {
    let percentage = if total > 0 {
        used as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    StorageStats {
        used,
        total,
        percentage,
        level: usage_level(percentage),
    }
}

pub fn usage_level(percentage: f64) -> UsageLevel {
    if percentage < USAGE_WARNING_PERCENT {
        UsageLevel::Normal
    } else if percentage < USAGE_CRITICAL_PERCENT {
        UsageLevel::Warning
    } else {
        UsageLevel::Critical
    }
}
