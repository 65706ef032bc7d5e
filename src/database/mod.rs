// file: src/database/mod.rs

use crate::calendar::{CalendarBackend, CalendarId};
use crate::error::AppResult;
use crate::models::CalendarEvent;
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::info;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Sqlite};
use std::path::Path;

// Declare submodules
pub mod calendars;
pub mod events;
pub mod reminders;

/// SQLite-backed calendar store.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn connect(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db_url = format!("sqlite:{}?mode=rwc", path.display());

        // Create database if it doesn't exist
        let db_exists = Sqlite::database_exists(&db_url)
            .await
            .context("Failed to check if database exists")?;
        if !db_exists {
            info!("Creating database at {}", path.display());
            Sqlite::create_database(&db_url)
                .await
                .context("Failed to create database")?;
        }

        let pool = SqlitePool::connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        run_schema(&pool).await.context("Failed to run database schema")?;

        info!("Database initialized successfully");

        Ok(Database { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CalendarBackend for Database {
    async fn calendars_by_name(&self, name: &str) -> AppResult<Vec<CalendarId>> {
        calendars::find_by_name(&self.pool, name).await
    }

    async fn create_calendar(&self, name: &str) -> AppResult<CalendarId> {
        calendars::create(&self.pool, name).await
    }

    async fn create_all_day_event(
        &self,
        calendar_id: &str,
        title: &str,
        date: NaiveDate,
        description: &str,
    ) -> AppResult<CalendarEvent> {
        events::create(&self.pool, calendar_id, title, date, description).await
    }

    async fn list_events(
        &self,
        calendar_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<CalendarEvent>> {
        events::list_between(&self.pool, calendar_id, start, end).await
    }

    async fn set_description(&self, event_id: &str, description: &str) -> AppResult<()> {
        events::set_description(&self.pool, event_id, description).await
    }

    async fn delete_event(&self, event_id: &str) -> AppResult<()> {
        events::delete(&self.pool, event_id).await
    }

    async fn clear_reminders(&self, event_id: &str) -> AppResult<()> {
        reminders::clear(&self.pool, event_id).await
    }

    async fn add_reminder(&self, event_id: &str, minutes_before: i64) -> AppResult<()> {
        reminders::add(&self.pool, event_id, minutes_before).await
    }
}

pub(crate) async fn run_schema(pool: &SqlitePool) -> AppResult<()> {
    let schema = include_str!("schema.sql");

    let mut current_statement = String::new();
    let mut in_trigger = false;

    for line in schema.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }

        if trimmed.to_uppercase().starts_with("CREATE TRIGGER") {
            in_trigger = true;
        }

        current_statement.push_str(line);
        current_statement.push('\n');

        if trimmed.ends_with(';') {
            if in_trigger {
                if trimmed.to_uppercase() == "END;" {
                    in_trigger = false;
                    sqlx::query(&current_statement).execute(pool).await?;
                    current_statement.clear();
                }
            } else {
                sqlx::query(&current_statement).execute(pool).await?;
                current_statement.clear();
            }
        }
    }
    Ok(())
}
