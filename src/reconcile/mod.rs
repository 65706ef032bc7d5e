// file: src/reconcile/mod.rs
//
// One reconciliation pass: statuses are written back to the sheet, duplicates are
// removed, every syncable row is matched to its event (or gets a new one) and events
// no row claimed are deleted. Stages run strictly one after another.

use crate::calendar::{
    get_or_create_calendar, index_existing_events, is_duplicate_event, remove_duplicate_events,
    CalendarBackend, CalendarId,
};
use crate::config::SyncConfig;
use crate::content::{compose_description, merge_descriptions, EventKey};
use crate::error::{AppError, AppResult};
use crate::models::{CalendarEvent, DeadlineItem, SyncReport};
use crate::policy::{reminder_minutes, status_for_item};
use crate::sheet::SheetSource;
use crate::utils::logging::log_sync_summary;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::{debug, error, info, warn};
use std::collections::HashMap;

/// What happened to a single row during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated,
    Unchanged,
    /// An equivalent event appeared on the same day after indexing.
    DuplicateSkipped,
}

pub struct Reconciler<'a> {
    config: &'a SyncConfig,
    sheet: &'a dyn SheetSource,
    backend: &'a dyn CalendarBackend,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        config: &'a SyncConfig,
        sheet: &'a dyn SheetSource,
        backend: &'a dyn CalendarBackend,
    ) -> Self {
        Self { config, sheet, backend }
    }

    pub async fn load_items(&self) -> AppResult<Vec<DeadlineItem>> {
        let rows = self.sheet.read_rows().await?;
        Ok(rows
            .iter()
            .enumerate()
            .map(|(index, row)| DeadlineItem::from_row(index, row))
            .collect())
    }

    /// Recomputes every row's status and writes the column back. `items` are updated in
    /// place so later stages see the new labels. Returns how many cells were written.
    pub async fn update_status_column(
        &self,
        items: &mut [DeadlineItem],
        now: NaiveDateTime,
    ) -> AppResult<usize> {
        if items.is_empty() {
            info!("No data rows found (only header row or empty sheet)");
            return Ok(0);
        }

        info!("Processing {} data rows", items.len());
        let mut statuses = Vec::with_capacity(items.len());
        for item in items.iter_mut() {
            let status = status_for_item(item, now);
            match item.expiry_date() {
                Some(_) => debug!("Row {}: {} -> {}", item.row_number, item.name, status),
                None => debug!(
                    "Row {}: {} -> {} (invalid/missing date)",
                    item.row_number, item.name, status
                ),
            }
            item.status = status.clone();
            statuses.push(status);
        }

        self.sheet.write_statuses(&statuses).await?;
        info!("Updated {} status values", statuses.len());
        Ok(statuses.len())
    }

    pub async fn calendar_id(&self) -> AppResult<CalendarId> {
        get_or_create_calendar(self.backend, &self.config.calendar_name).await
    }

    /// Full pass. Row-level store failures are logged and counted; failures reading the
    /// sheet or listing the calendar end the pass with an error.
    pub async fn sync(&self, now: NaiveDateTime) -> AppResult<SyncReport> {
        let today = now.date();
        let mut report = SyncReport::new();
        let calendar_id = self.calendar_id().await?;

        let mut items = self.load_items().await?;
        report.statuses_written = self.update_status_column(&mut items, now).await?;

        report.duplicates_removed = remove_duplicate_events(
            self.backend,
            &calendar_id,
            today,
            self.config.lookahead_years,
        )
        .await?;
        if report.duplicates_removed > 0 {
            info!(
                "Removed {} duplicate events from calendar",
                report.duplicates_removed
            );
        }

        let mut existing =
            index_existing_events(self.backend, &calendar_id, today, self.config.lookahead_years)
                .await?;

        for item in &items {
            let date = match item.syncable_date() {
                Ok(date) => date,
                Err(AppError::InvalidDate(reason)) => {
                    warn!("Skipping row with invalid expiry date: {}", reason);
                    report.invalid_dates += 1;
                    continue;
                }
                Err(e) if e.is_row_skip() => {
                    debug!("Skipping row: {}", e);
                    report.rows_skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            match self.upsert_item(&calendar_id, item, date, &mut existing).await {
                Ok(RowOutcome::Created) => report.events_created += 1,
                Ok(RowOutcome::Updated) => report.events_updated += 1,
                Ok(RowOutcome::Unchanged) => report.events_unchanged += 1,
                Ok(RowOutcome::DuplicateSkipped) => report.creations_skipped += 1,
                Err(e) => {
                    error!("Error syncing row {} ({}): {}", item.row_number, item.name, e);
                    report.failures += 1;
                }
            }
        }

        if !self.config.delete_orphans {
            debug!("Orphan deletion disabled, keeping {} events", existing.len());
        } else if items.is_empty() {
            warn!(
                "Sheet has no data rows; keeping {} existing events instead of deleting them",
                existing.len()
            );
        } else if report.invalid_dates > 0 {
            warn!(
                "{} rows have invalid dates; keeping {} unmatched events",
                report.invalid_dates,
                existing.len()
            );
        } else {
            let (deleted, failed) = self.delete_orphans(existing).await;
            report.orphans_deleted = deleted;
            report.failures += failed;
        }

        log_sync_summary(&report);
        Ok(report)
    }

    /// Brings the event for `item` up to date, creating it when no indexed event matches.
    /// A matched event is claimed from `existing` before it is touched, so it is never
    /// treated as an orphan even when the update fails.
    pub async fn upsert_item(
        &self,
        calendar_id: &str,
        item: &DeadlineItem,
        date: NaiveDate,
        existing: &mut HashMap<EventKey, CalendarEvent>,
    ) -> AppResult<RowOutcome> {
        let title = item.title();
        let key = EventKey::new(&title, date);
        let generated = compose_description(item, date);

        if let Some(event) = existing.remove(&key) {
            let merged = merge_descriptions(event.description.as_deref(), &generated);
            if merged == event.description_text() {
                debug!("Event unchanged: {}", event.title);
                return Ok(RowOutcome::Unchanged);
            }

            self.backend.set_description(&event.id, &merged).await?;
            debug!("Updated existing event: {}", event.title);
            return Ok(RowOutcome::Updated);
        }

        if is_duplicate_event(self.backend, calendar_id, &title, date).await? {
            warn!("Skipping creation of duplicate event: {}", title);
            return Ok(RowOutcome::DuplicateSkipped);
        }

        let event = self
            .backend
            .create_all_day_event(calendar_id, &title, date, &generated)
            .await?;
        if let Err(e) = self.apply_reminders(&event.id, item).await {
            error!(
                "Event {} ({}) was created but its reminders are incomplete: {}",
                event.id, title, e
            );
            return Err(AppError::store(format!(
                "reminders incomplete for event {}: {}",
                event.id, e
            )));
        }
        info!("Created new event: {}", title);
        Ok(RowOutcome::Created)
    }

    /// Replaces the event's reminders with the schedule for `item`.
    pub async fn apply_reminders(&self, event_id: &str, item: &DeadlineItem) -> AppResult<()> {
        self.backend.clear_reminders(event_id).await?;
        let schedule =
            reminder_minutes(item.priority_level(), item.manual_action(), item.auto_renew());
        for minutes in schedule {
            self.backend.add_reminder(event_id, minutes).await?;
        }
        Ok(())
    }

    /// Deletes every unclaimed event. Returns (deleted, failed).
    pub async fn delete_orphans(
        &self,
        orphans: HashMap<EventKey, CalendarEvent>,
    ) -> (usize, usize) {
        let mut deleted = 0;
        let mut failed = 0;
        for (_, event) in orphans {
            match self.backend.delete_event(&event.id).await {
                Ok(()) => {
                    deleted += 1;
                    info!("Deleted orphaned event: {}", event.title);
                }
                Err(e) => {
                    failed += 1;
                    error!("Error deleting orphaned event {}: {}", event.title, e);
                }
            }
        }
        if deleted > 0 {
            info!("Cleaned up {} orphaned events", deleted);
        }
        (deleted, failed)
    }

    /// Status write-back only; the calendar is not touched.
    pub async fn update_statuses_only(&self, now: NaiveDateTime) -> AppResult<usize> {
        let mut items = self.load_items().await?;
        self.update_status_column(&mut items, now).await
    }

    pub async fn cleanup_duplicates(&self, today: NaiveDate) -> AppResult<usize> {
        let calendar_id = self.calendar_id().await?;
        let removed =
            remove_duplicate_events(self.backend, &calendar_id, today, self.config.lookahead_years)
                .await?;

        if removed > 0 {
            info!("Successfully removed {} duplicate events", removed);
        } else {
            info!("No duplicate events found");
        }
        Ok(removed)
    }

    /// Rows whose expiry falls in `[today, today + upcoming_days]`, in sheet order.
    pub async fn upcoming_deadlines(&self, today: NaiveDate) -> AppResult<Vec<DeadlineItem>> {
        let horizon = today + Duration::days(i64::from(self.config.upcoming_days));
        let upcoming: Vec<DeadlineItem> = self
            .load_items()
            .await?
            .into_iter()
            .filter(|item| matches!(item.expiry_date(), Some(d) if d >= today && d <= horizon))
            .collect();

        info!(
            "Upcoming deadlines in next {} days: {}",
            self.config.upcoming_days,
            upcoming.len()
        );
        for item in &upcoming {
            info!("{}", item);
        }
        Ok(upcoming)
    }
}
