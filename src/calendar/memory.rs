//! In-memory calendar backend.
//!
//! Keeps everything in a mutex-guarded vector and counts the mutating calls, which makes
//! it the backend of choice for tests and dry runs.

use crate::calendar::{CalendarBackend, CalendarId};
use crate::error::{AppError, AppResult};
use crate::models::CalendarEvent;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::{Mutex, MutexGuard};

/// How many mutating calls hit the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperationCounts {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub reminders_added: usize,
}

#[derive(Debug, Default)]
struct MemoryState {
    calendars: Vec<(CalendarId, String)>,
    events: Vec<CalendarEvent>,
    next_id: u64,
    counts: OperationCounts,
    failing_titles: Vec<String>,
    last_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct InMemoryCalendar {
    state: Mutex<MemoryState>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Stores an event as-is, bypassing the counters. For seeding test fixtures.
    pub fn insert_event(&self, event: CalendarEvent) {
        self.lock().events.push(event);
    }

    pub fn events(&self) -> Vec<CalendarEvent> {
        self.lock().events.clone()
    }

    pub fn event_by_title(&self, title: &str) -> Option<CalendarEvent> {
        self.lock().events.iter().find(|e| e.title == title).cloned()
    }

    pub fn counts(&self) -> OperationCounts {
        self.lock().counts
    }

    pub fn reset_counts(&self) {
        self.lock().counts = OperationCounts::default();
    }

    /// Any create, update or delete touching a title containing `fragment` fails.
    pub fn fail_on_title(&self, fragment: &str) {
        self.lock().failing_titles.push(fragment.to_string());
    }

    fn check_failure(state: &MemoryState, title: &str) -> AppResult<()> {
        if state.failing_titles.iter().any(|f| title.contains(f.as_str())) {
            return Err(AppError::store(format!("injected failure for '{}'", title)));
        }
        Ok(())
    }

    fn title_of(state: &MemoryState, event_id: &str) -> AppResult<String> {
        state
            .events
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| e.title.clone())
            .ok_or_else(|| AppError::not_found(format!("event {}", event_id)))
    }
}

#[async_trait]
impl CalendarBackend for InMemoryCalendar {
    async fn calendars_by_name(&self, name: &str) -> AppResult<Vec<CalendarId>> {
        Ok(self
            .lock()
            .calendars
            .iter()
            .filter(|(_, n)| n == name)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn create_calendar(&self, name: &str) -> AppResult<CalendarId> {
        let mut state = self.lock();
        state.next_id += 1;
        let id = format!("cal-{}", state.next_id);
        state.calendars.push((id.clone(), name.to_string()));
        Ok(id)
    }

    async fn create_all_day_event(
        &self,
        calendar_id: &str,
        title: &str,
        date: NaiveDate,
        description: &str,
    ) -> AppResult<CalendarEvent> {
        let mut state = self.lock();
        Self::check_failure(&state, title)?;

        // Creation times strictly increase so "most recent" is well defined.
        let mut created_at = Utc::now();
        if let Some(last) = state.last_created {
            if created_at <= last {
                created_at = last + Duration::milliseconds(1);
            }
        }
        state.last_created = Some(created_at);
        state.next_id += 1;

        let event = CalendarEvent {
            id: format!("evt-{}", state.next_id),
            calendar_id: calendar_id.to_string(),
            title: title.to_string(),
            date,
            description: Some(description.to_string()),
            reminders: Vec::new(),
            created_at: Some(created_at),
        };
        state.events.push(event.clone());
        state.counts.created += 1;
        Ok(event)
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<CalendarEvent>> {
        let mut events: Vec<CalendarEvent> = self
            .lock()
            .events
            .iter()
            .filter(|e| e.calendar_id == calendar_id && e.date >= start && e.date < end)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn set_description(&self, event_id: &str, description: &str) -> AppResult<()> {
        let mut state = self.lock();
        let title = Self::title_of(&state, event_id)?;
        Self::check_failure(&state, &title)?;

        if let Some(event) = state.events.iter_mut().find(|e| e.id == event_id) {
            event.description = Some(description.to_string());
        }
        state.counts.updated += 1;
        Ok(())
    }

    async fn delete_event(&self, event_id: &str) -> AppResult<()> {
        let mut state = self.lock();
        let title = Self::title_of(&state, event_id)?;
        Self::check_failure(&state, &title)?;

        state.events.retain(|e| e.id != event_id);
        state.counts.deleted += 1;
        Ok(())
    }

    async fn clear_reminders(&self, event_id: &str) -> AppResult<()> {
        let mut state = self.lock();
        match state.events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => {
                event.reminders.clear();
                Ok(())
            }
            None => Err(AppError::not_found(format!("event {}", event_id))),
        }
    }

    async fn add_reminder(&self, event_id: &str, minutes_before: i64) -> AppResult<()> {
        let mut state = self.lock();
        match state.events.iter_mut().find(|e| e.id == event_id) {
            Some(event) => event.reminders.push(minutes_before),
            None => return Err(AppError::not_found(format!("event {}", event_id))),
        }
        state.counts.reminders_added += 1;
        Ok(())
    }
}
