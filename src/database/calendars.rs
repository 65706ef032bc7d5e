// file: src/database/calendars.rs
use crate::calendar::CalendarId;
use crate::error::AppResult;
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> AppResult<Vec<CalendarId>> {
    let ids = sqlx::query_scalar::<_, String>(
        "SELECT id FROM calendars WHERE name = ? ORDER BY created_at ASC",
    )
    .bind(name)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

pub async fn create(pool: &SqlitePool, name: &str) -> AppResult<CalendarId> {
    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO calendars (id, name, created_at) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(name)
        .bind(chrono::Utc::now())
        .execute(pool)
        .await?;

    Ok(id)
}
