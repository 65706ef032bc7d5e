// file: src/models/sync.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counters for one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    pub statuses_written: usize,
    pub duplicates_removed: usize,
    pub events_created: usize,
    pub events_updated: usize,
    pub events_unchanged: usize,
    pub creations_skipped: usize,
    pub orphans_deleted: usize,
    pub rows_skipped: usize,
    pub invalid_dates: usize,
    pub failures: usize,
    pub sync_time: DateTime<Utc>,
}

impl SyncReport {
    pub fn new() -> Self {
        Self {
            statuses_written: 0,
            duplicates_removed: 0,
            events_created: 0,
            events_updated: 0,
            events_unchanged: 0,
            creations_skipped: 0,
            orphans_deleted: 0,
            rows_skipped: 0,
            invalid_dates: 0,
            failures: 0,
            sync_time: Utc::now(),
        }
    }

    /// Whether the pass mutated the calendar at all.
    pub fn changed_calendar(&self) -> bool {
        self.duplicates_removed + self.events_created + self.events_updated + self.orphans_deleted
            > 0
    }

    pub fn success(&self) -> bool {
        self.failures == 0
    }
}

impl Default for SyncReport {
    fn default() -> Self {
        Self::new()
    }
}
