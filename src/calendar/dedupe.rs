// file: src/calendar/dedupe.rs
use crate::calendar::CalendarBackend;
use crate::content::title::{normalize_event_title, EventKey};
use crate::error::AppResult;
use crate::models::CalendarEvent;
use chrono::{Duration, Months, NaiveDate};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, HashMap};

/// Dates `[today, today + years)` scanned for tracker-managed events.
pub fn tracked_window(today: NaiveDate, lookahead_years: u32) -> (NaiveDate, NaiveDate) {
    let end = lookahead_years
        .checked_mul(12)
        .and_then(|months| today.checked_add_months(Months::new(months)))
        .unwrap_or(NaiveDate::MAX);
    (today, end)
}

pub fn event_key_of(event: &CalendarEvent) -> EventKey {
    EventKey::new(&event.title, event.date)
}

/// Groups tracked events sharing a key, each group ordered most recently created first.
/// Only groups with more than one member are returned.
pub fn duplicate_groups(events: Vec<CalendarEvent>) -> Vec<(EventKey, Vec<CalendarEvent>)> {
    let mut groups: BTreeMap<EventKey, Vec<CalendarEvent>> = BTreeMap::new();
    for event in events.into_iter().filter(CalendarEvent::is_tracked) {
        groups.entry(event_key_of(&event)).or_default().push(event);
    }

    groups
        .into_iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(key, mut group)| {
            // Missing creation time sorts as the oldest.
            group.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            (key, group)
        })
        .collect()
}

/// Deletes all but the most recently created event of every duplicate group in the
/// tracked window. Returns how many were deleted; failed deletes are logged and skipped.
pub async fn remove_duplicate_events(
    backend: &dyn CalendarBackend,
    calendar_id: &str,
    today: NaiveDate,
    lookahead_years: u32,
) -> AppResult<usize> {
    let (start, end) = tracked_window(today, lookahead_years);
    let events = backend.list_events(calendar_id, start, end).await?;

    let mut removed = 0;
    for (key, group) in duplicate_groups(events) {
        info!("Found {} duplicate events for: {}", group.len(), key);

        for event in group.iter().skip(1) {
            match backend.delete_event(&event.id).await {
                Ok(()) => {
                    removed += 1;
                    info!("Deleted duplicate event: {}", event.title);
                }
                Err(e) => error!("Error deleting duplicate event {}: {}", event.title, e),
            }
        }
    }

    Ok(removed)
}

/// Tracked events in the window, keyed for matching against sheet rows.
pub async fn index_existing_events(
    backend: &dyn CalendarBackend,
    calendar_id: &str,
    today: NaiveDate,
    lookahead_years: u32,
) -> AppResult<HashMap<EventKey, CalendarEvent>> {
    let (start, end) = tracked_window(today, lookahead_years);
    let events = backend.list_events(calendar_id, start, end).await?;

    let mut index = HashMap::new();
    for event in events.into_iter().filter(CalendarEvent::is_tracked) {
        let key = event_key_of(&event);
        if index.contains_key(&key) {
            warn!("Potential duplicate detected: {} on {}", event.title, event.date);
        }
        index.insert(key, event);
    }

    info!("Found {} existing deadline events", index.len());
    Ok(index)
}

/// Re-checks the calendar right before creating `title` on `date`.
pub async fn is_duplicate_event(
    backend: &dyn CalendarBackend,
    calendar_id: &str,
    title: &str,
    date: NaiveDate,
) -> AppResult<bool> {
    let normalized = normalize_event_title(title);
    let same_day = backend
        .list_events(calendar_id, date, date + Duration::days(1))
        .await?;

    let duplicate = same_day
        .iter()
        .filter(|e| e.is_tracked())
        .any(|e| normalize_event_title(&e.title) == normalized);

    if duplicate {
        debug!("Duplicate detected: \"{}\" already exists on {}", title, date);
    }
    Ok(duplicate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{InMemoryCalendar, MockCalendarBackend};
    use crate::error::AppError;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 20).unwrap()
    }

    fn tracked(id: &str, title: &str, date: NaiveDate, created_secs: Option<i64>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            calendar_id: "cal".to_string(),
            title: title.to_string(),
            date,
            description: None,
            reminders: Vec::new(),
            created_at: created_secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        }
    }

    #[test]
    fn test_tracked_window_spans_years() {
        let (start, end) = tracked_window(today(), 4);
        assert_eq!(start, today());
        assert_eq!(end, NaiveDate::from_ymd_opt(2028, 2, 20).unwrap());
    }

    #[test]
    fn test_tracked_window_saturates_for_huge_lookahead() {
        let (start, end) = tracked_window(today(), u32::MAX);
        assert_eq!(start, today());
        assert_eq!(end, NaiveDate::MAX);
    }

    #[test]
    fn test_duplicate_groups_orders_newest_first() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let groups = duplicate_groups(vec![
            tracked("a", "Cert: X EXPIRES", date, Some(100)),
            tracked("b", "Cert: X EXPIRES (Auto-Renewing)", date, None),
            tracked("c", "CERT:  X EXPIRES", date, Some(300)),
            tracked("d", "Cert: Y EXPIRES", date, Some(50)),
            tracked("e", "Lunch", date, Some(10)),
        ]);

        assert_eq!(groups.len(), 1);
        let ids: Vec<_> = groups[0].1.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_remove_duplicates_keeps_most_recent() {
        let cal = InMemoryCalendar::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        cal.insert_event(tracked("t1", "Cert: X EXPIRES", date, Some(1_000)));
        cal.insert_event(tracked("t3", "Cert: X EXPIRES", date, Some(3_000)));
        cal.insert_event(tracked("t2", "Cert: X EXPIRES (Auto-Renewing)", date, Some(2_000)));

        let removed = remove_duplicate_events(&cal, "cal", today(), 4).await.unwrap();

        assert_eq!(removed, 2);
        let remaining = cal.events();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "t3");
    }

    #[tokio::test]
    async fn test_remove_duplicates_continues_after_failed_delete() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let events = vec![
            tracked("new", "Cert: X EXPIRES", date, Some(30)),
            tracked("old1", "Cert: X EXPIRES", date, Some(20)),
            tracked("old2", "Cert: X EXPIRES", date, Some(10)),
        ];

        let mut backend = MockCalendarBackend::new();
        backend
            .expect_list_events()
            .returning(move |_, _, _| Ok(events.clone()));
        backend.expect_delete_event().returning(|id| {
            if id == "old1" {
                Err(AppError::store("backend unavailable"))
            } else {
                Ok(())
            }
        });

        let removed = remove_duplicate_events(&backend, "cal", today(), 4).await.unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn test_events_outside_window_are_ignored() {
        let cal = InMemoryCalendar::new();
        let past = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        cal.insert_event(tracked("p1", "Cert: X EXPIRES", past, Some(1)));
        cal.insert_event(tracked("p2", "Cert: X EXPIRES", past, Some(2)));

        assert_eq!(remove_duplicate_events(&cal, "cal", today(), 4).await.unwrap(), 0);
        assert!(index_existing_events(&cal, "cal", today(), 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_is_duplicate_event_same_day_only() {
        let cal = InMemoryCalendar::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        cal.insert_event(tracked("x", "Cert: X EXPIRES (Auto-Renewing)", date, None));

        assert!(is_duplicate_event(&cal, "cal", "Cert: X EXPIRES", date).await.unwrap());
        assert!(!is_duplicate_event(&cal, "cal", "Cert: X EXPIRES", date + Duration::days(1))
            .await
            .unwrap());
        assert!(!is_duplicate_event(&cal, "cal", "Cert: Y EXPIRES", date).await.unwrap());
    }

    #[tokio::test]
    async fn test_index_last_event_wins_on_shared_key() {
        let cal = InMemoryCalendar::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        cal.insert_event(tracked("first", "Cert: X EXPIRES", date, Some(1)));
        cal.insert_event(tracked("second", "Cert: X EXPIRES", date, Some(2)));

        let index = index_existing_events(&cal, "cal", today(), 4).await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.values().next().unwrap().id, "second");
    }
}
