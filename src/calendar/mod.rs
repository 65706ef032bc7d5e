// Calendar integration module
// The reconciliation engine talks to calendars only through `CalendarBackend`.

use crate::error::AppResult;
use crate::models::CalendarEvent;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;

pub mod dedupe;
pub mod ics;
pub mod memory;

pub use dedupe::{index_existing_events, is_duplicate_event, remove_duplicate_events};
pub use memory::InMemoryCalendar;

pub type CalendarId = String;

/// Operations the reconciliation engine needs from a calendar service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    async fn calendars_by_name(&self, name: &str) -> AppResult<Vec<CalendarId>>;

    async fn create_calendar(&self, name: &str) -> AppResult<CalendarId>;

    async fn create_all_day_event(
        &self,
        calendar_id: &str,
        title: &str,
        date: NaiveDate,
        description: &str,
    ) -> AppResult<CalendarEvent>;

    /// Events whose date falls in `[start, end)`.
    async fn list_events(
        &self,
        calendar_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<CalendarEvent>>;

    async fn set_description(&self, event_id: &str, description: &str) -> AppResult<()>;

    async fn delete_event(&self, event_id: &str) -> AppResult<()>;

    async fn clear_reminders(&self, event_id: &str) -> AppResult<()>;

    async fn add_reminder(&self, event_id: &str, minutes_before: i64) -> AppResult<()>;
}

/// First calendar called `name`, created when none exists.
pub async fn get_or_create_calendar(
    backend: &dyn CalendarBackend,
    name: &str,
) -> AppResult<CalendarId> {
    if let Some(id) = backend.calendars_by_name(name).await?.into_iter().next() {
        return Ok(id);
    }

    let id = backend.create_calendar(name).await?;
    info!("Created new calendar: {}", name);
    Ok(id)
}
