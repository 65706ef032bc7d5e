// file: src/database/reminders.rs
use crate::database::events;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Lead times in the order they were added.
pub async fn for_event(pool: &SqlitePool, event_id: &str) -> AppResult<Vec<i64>> {
    let minutes = sqlx::query_scalar::<_, i64>(
        "SELECT minutes_before FROM reminders WHERE event_id = ? ORDER BY position ASC",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    Ok(minutes)
}

pub async fn clear(pool: &SqlitePool, event_id: &str) -> AppResult<()> {
    if !events::exists(pool, event_id).await? {
        return Err(AppError::not_found(format!("event {}", event_id)));
    }

    sqlx::query("DELETE FROM reminders WHERE event_id = ?")
        .bind(event_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn add(pool: &SqlitePool, event_id: &str, minutes_before: i64) -> AppResult<()> {
    if !events::exists(pool, event_id).await? {
        return Err(AppError::not_found(format!("event {}", event_id)));
    }

    sqlx::query(
        r#"
        INSERT INTO reminders (event_id, position, minutes_before)
        SELECT ?, COALESCE(MAX(position), -1) + 1, ?
        FROM reminders
        WHERE event_id = ?
        "#,
    )
    .bind(event_id)
    .bind(minutes_before)
    .bind(event_id)
    .execute(pool)
    .await?;

    Ok(())
}
