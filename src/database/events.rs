// file: src/database/events.rs
use crate::database::reminders;
use crate::error::{AppError, AppResult};
use crate::models::CalendarEvent;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: String,
    calendar_id: String,
    title: String,
    event_date: NaiveDate,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl EventRow {
    fn into_event(self, reminders: Vec<i64>) -> CalendarEvent {
        CalendarEvent {
            id: self.id,
            calendar_id: self.calendar_id,
            title: self.title,
            date: self.event_date,
            description: self.description,
            reminders,
            created_at: Some(self.created_at),
        }
    }
}

pub async fn create(
    pool: &SqlitePool,
    calendar_id: &str,
    title: &str,
    date: NaiveDate,
    description: &str,
) -> AppResult<CalendarEvent> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO events (id, calendar_id, title, event_date, description, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(calendar_id)
    .bind(title)
    .bind(date)
    .bind(description)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(CalendarEvent {
        id,
        calendar_id: calendar_id.to_string(),
        title: title.to_string(),
        date,
        description: Some(description.to_string()),
        reminders: Vec::new(),
        created_at: Some(now),
    })
}

/// Events dated in `[start, end)`, oldest date first.
pub async fn list_between(
    pool: &SqlitePool,
    calendar_id: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<CalendarEvent>> {
    let rows = sqlx::query_as::<_, EventRow>(
        r#"
        SELECT id, calendar_id, title, event_date, description, created_at
        FROM events
        WHERE calendar_id = ?
            AND event_date >= ?
            AND event_date < ?
        ORDER BY event_date ASC, created_at ASC
        "#,
    )
    .bind(calendar_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut events = Vec::with_capacity(rows.len());
    for row in rows {
        let minutes = reminders::for_event(pool, &row.id).await?;
        events.push(row.into_event(minutes));
    }
    Ok(events)
}

pub async fn exists(pool: &SqlitePool, event_id: &str) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE id = ?")
        .bind(event_id)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn set_description(
    pool: &SqlitePool,
    event_id: &str,
    description: &str,
) -> AppResult<()> {
    let result = sqlx::query("UPDATE events SET description = ?, updated_at = ? WHERE id = ?")
        .bind(description)
        .bind(Utc::now())
        .bind(event_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("event {}", event_id)));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, event_id: &str) -> AppResult<()> {
    // Reminders go with the event through the cascade.
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(event_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(format!("event {}", event_id)));
    }
    Ok(())
}
