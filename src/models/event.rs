// file: src/models/event.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of an all-day calendar event as returned by a backend listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub calendar_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub description: Option<String>,
    /// Lead times in minutes, in the order they were added.
    pub reminders: Vec<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CalendarEvent {
    /// Marker substring every tracker-managed title carries.
    pub const TRACKED_MARKER: &'static str = "EXPIRES";

    pub fn is_tracked(&self) -> bool {
        self.title.contains(Self::TRACKED_MARKER)
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}
