use crate::models::SyncReport;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, SetLoggerError};
use std::env;
use std::io::Write;

fn level_from_env(value: &str) -> LevelFilter {
    match value.to_lowercase().as_str() {
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

pub fn init_logging() -> Result<(), SetLoggerError> {
    let env = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let log_level = level_from_env(&env);

    let mut builder = Builder::from_default_env();

    builder.format(|buf, record| {
        let timestamp = buf.timestamp();
        let target = record.target();
        let file = record.file().unwrap_or("unknown");
        let line = record.line().unwrap_or(0);

        match record.level() {
            Level::Info => writeln!(buf, "{} [INFO] [{}]: {}", timestamp, target, record.args()),
            level => writeln!(
                buf,
                "{} [{}] [{}:{}] {}: {}",
                timestamp, level, file, line, target, record.args()
            ),
        }
    });

    // Filter out noisy modules in production
    if env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()) == "production" {
        builder.filter_module("tokio", LevelFilter::Info);
        builder.filter_module("sqlx", LevelFilter::Warn);
    }

    builder.filter_level(log_level).target(Target::Stdout).try_init()
}

pub fn log_error_with_context(error: &anyhow::Error, context: &str) {
    log::error!("[{}] {}", context, error);

    let mut source = error.source();
    while let Some(err) = source {
        log::error!("  Caused by: {}", err);
        source = err.source();
    }
}

pub fn log_sync_summary(report: &SyncReport) {
    log::info!(
        "[Sync] statuses={} created={} updated={} unchanged={} duplicates_removed={} orphans_deleted={}",
        report.statuses_written,
        report.events_created,
        report.events_updated,
        report.events_unchanged,
        report.duplicates_removed,
        report.orphans_deleted,
    );

    if report.rows_skipped + report.invalid_dates + report.creations_skipped > 0 {
        log::info!(
            "[Sync] skipped rows={} invalid dates={} duplicate creations={}",
            report.rows_skipped,
            report.invalid_dates,
            report.creations_skipped,
        );
    }

    if report.success() {
        log::info!("Successfully synced deadlines to calendar");
    } else {
        log::warn!("[Sync] finished with {} failed operations", report.failures);
    }
}
