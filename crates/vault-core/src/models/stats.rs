use serde::{Deserialize, Serialize};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Aggregate storage usage, recomputed by the server on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StatsResponse {
    pub total_storage_used_bytes: u64,
    pub original_storage_used_bytes: u64,
    pub storage_savings_bytes: u64,
    pub storage_savings_percentage: f64,
    pub storage_quota_mb: f64,
    pub quota_used_percentage: f64,
}

impl StatsResponse {
    pub fn quota_bytes(&self) -> u64 {
        (self.storage_quota_mb * BYTES_PER_MB) as u64
    }

    /// Whether deduplication has saved any space so far
    pub fn dedup_active(&self) -> bool {
        self.storage_savings_percentage > 0.0
    }
}
