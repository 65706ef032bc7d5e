// Deadline Sync - keeps a calendar of expiry reminders in step with a deadline sheet
// Main entry point for the command line tool

use anyhow::{Context, Result};
use chrono::{Duration, Local};
use clap::{Parser, Subcommand};
use deadline_sync::calendar::dedupe::tracked_window;
use deadline_sync::calendar::ics::render_calendar;
use deadline_sync::utils::logging::{init_logging, log_error_with_context};
use deadline_sync::{AppState, CalendarBackend, SyncConfig};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "deadline-sync")]
#[command(about = "Sync expiry deadlines from a spreadsheet into a calendar")]
struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update statuses, remove duplicates and reconcile every row with the calendar
    Sync,
    /// Recompute the status column without touching the calendar
    UpdateStatuses,
    /// Remove duplicate deadline events, keeping the most recently created
    CleanupDuplicates,
    /// List rows expiring within the configured window
    Upcoming,
    /// Write the deadline calendar to an iCalendar file
    Export {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Run a sync every day at the configured hour until interrupted
    Daemon,
}

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();
    let config = SyncConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let state = AppState::initialize(config)
        .await
        .context("Failed to open the calendar database")?;

    let result = run(cli.command, &state).await;
    state.db.close().await;

    if let Err(ref e) = result {
        log_error_with_context(e, "deadline-sync");
    }
    result
}

async fn run(command: Commands, state: &AppState) -> Result<()> {
    let now = Local::now().naive_local();
    let reconciler = state.reconciler();

    match command {
        Commands::Sync => {
            let report = reconciler.sync(now).await.context("Error syncing deadlines")?;
            if !report.success() {
                warn!(
                    "{} operations failed; they will be retried on the next sync",
                    report.failures
                );
            }
        }
        Commands::UpdateStatuses => {
            reconciler
                .update_statuses_only(now)
                .await
                .context("Error updating statuses")?;
        }
        Commands::CleanupDuplicates => {
            reconciler
                .cleanup_duplicates(now.date())
                .await
                .context("Error cleaning up duplicates")?;
        }
        Commands::Upcoming => {
            let upcoming = reconciler
                .upcoming_deadlines(now.date())
                .await
                .context("Error reading upcoming deadlines")?;
            for item in upcoming {
                println!("{}", item);
            }
        }
        Commands::Export { output } => {
            let calendar_id = reconciler.calendar_id().await?;
            let today = now.date();
            let (_, end) = tracked_window(today, state.config.lookahead_years);
            let events = state
                .db
                .list_events(&calendar_id, today - Duration::days(365), end)
                .await
                .context("Failed to list calendar events")?;

            let ics = render_calendar(&state.config.calendar_name, &events);
            std::fs::write(&output, ics)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Exported {} events to {}", events.len(), output.display());
        }
        Commands::Daemon => {
            let shutdown = state.shutdown.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Ctrl-C received, shutting down");
                    shutdown.cancel();
                }
            });

            deadline_sync::scheduler::run_daily(
                state.config.daily_sync_hour,
                state.shutdown.clone(),
                move || async move { state.run_sync().await.map(|_| ()) },
            )
            .await;
        }
    }

    Ok(())
}
