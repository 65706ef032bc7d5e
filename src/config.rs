//! Sync configuration.
//!
//! Loaded from a TOML file (`--config <path>` or the platform config directory),
//! then overridden from the environment. A missing file means defaults.

use crate::error::{AppError, AppResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "deadline-sync";
pub const CONFIG_FILE: &str = "config.toml";
pub const MAX_LOOKAHEAD_YEARS: u32 = 100;

pub const ENV_CALENDAR: &str = "DEADLINE_SYNC_CALENDAR";
pub const ENV_SHEET: &str = "DEADLINE_SYNC_SHEET";
pub const ENV_WORKBOOK: &str = "DEADLINE_SYNC_WORKBOOK";
pub const ENV_DATABASE: &str = "DEADLINE_SYNC_DATABASE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Calendar receiving the deadline events; created on first sync.
    pub calendar_name: String,
    /// Sheet of the workbook holding the deadline rows.
    pub sheet_name: String,
    pub workbook_path: PathBuf,
    pub database_path: PathBuf,
    /// How far ahead of today events are indexed and deduplicated.
    pub lookahead_years: u32,
    /// Window of the `upcoming` report, inclusive of both ends.
    pub upcoming_days: u32,
    /// Local hour at which the daemon runs its daily sync.
    pub daily_sync_hour: u32,
    /// Delete events no sheet row matches any more.
    pub delete_orphans: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            calendar_name: "SRE Deadlines".to_string(),
            sheet_name: "SRE Deadlines".to_string(),
            workbook_path: PathBuf::from("deadlines.json"),
            database_path: default_database_path(),
            lookahead_years: 4,
            upcoming_days: 30,
            daily_sync_hour: 9,
            delete_orphans: true,
        }
    }
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("deadlines.db")
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

impl SyncConfig {
    /// Reads `path` (or the default location), applies environment overrides and
    /// validates the result.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let path = path.map(Path::to_path_buf).or_else(default_config_path);

        let mut config = match path {
            Some(ref path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                Self::from_toml(&std::fs::read_to_string(path)?)?
            }
            Some(ref path) => {
                debug!("No configuration at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> AppResult<Self> {
        toml::from_str(raw).map_err(|e| AppError::config(format!("Invalid config file: {}", e)))
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(value) = env_value(ENV_CALENDAR) {
            self.calendar_name = value;
        }
        if let Some(value) = env_value(ENV_SHEET) {
            self.sheet_name = value;
        }
        if let Some(value) = env_value(ENV_WORKBOOK) {
            self.workbook_path = PathBuf::from(value);
        }
        if let Some(value) = env_value(ENV_DATABASE) {
            self.database_path = PathBuf::from(value);
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.calendar_name.trim().is_empty() {
            return Err(AppError::config("calendar_name must not be blank"));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(AppError::config("sheet_name must not be blank"));
        }
        if self.lookahead_years == 0 || self.lookahead_years > MAX_LOOKAHEAD_YEARS {
            return Err(AppError::config(format!(
                "lookahead_years must be between 1 and {}, got {}",
                MAX_LOOKAHEAD_YEARS, self.lookahead_years
            )));
        }
        if self.daily_sync_hour > 23 {
            return Err(AppError::config(format!(
                "daily_sync_hour must be between 0 and 23, got {}",
                self.daily_sync_hour
            )));
        }
        Ok(())
    }
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
