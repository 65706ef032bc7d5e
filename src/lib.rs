// Deadline Sync Library
// Reconciles a deadline spreadsheet into a calendar of all-day reminder events.

pub mod calendar;
pub mod config;
pub mod content;
pub mod database;
pub mod error;
pub mod models;
pub mod policy;
pub mod reconcile;
pub mod scheduler;
pub mod sheet;
pub mod utils;

// Re-export commonly used types
pub use calendar::{CalendarBackend, InMemoryCalendar};
pub use config::SyncConfig;
pub use database::Database;
pub use error::{AppError, AppResult};
pub use models::*;
pub use reconcile::{Reconciler, RowOutcome};
pub use sheet::{MemorySheet, SheetSource, WorkbookSheet};

use chrono::Local;
use std::sync::Arc;

/// Application state shared by the CLI commands and the daemon loop
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SyncConfig>,
    pub db: Arc<Database>,
    pub sheet: Arc<WorkbookSheet>,
    pub shutdown: tokio_util::sync::CancellationToken,
}

impl AppState {
    pub async fn initialize(config: SyncConfig) -> AppResult<Self> {
        let db = Database::connect(&config.database_path).await?;
        let sheet = WorkbookSheet::new(&config.workbook_path, &config.sheet_name);

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            sheet: Arc::new(sheet),
            shutdown: tokio_util::sync::CancellationToken::new(),
        })
    }

    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(&self.config, self.sheet.as_ref(), self.db.as_ref())
    }

    /// One full pass stamped with the current local time.
    pub async fn run_sync(&self) -> AppResult<SyncReport> {
        self.reconciler().sync(Local::now().naive_local()).await
    }
}
