//! Storage usage figures derived from the file store.

use serde::Serialize;

/// Coarse usage band shown by the storage indicator.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UsageLevel {
    Normal,
    Warning,
    Critical,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageStats {
    /// Sum of all file sizes, in bytes.
    pub used: u64,
    /// Quota, in bytes.
    pub total: u64,
    pub percentage: f64,
    pub level: UsageLevel,
}
