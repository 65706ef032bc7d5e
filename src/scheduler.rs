// file: src/scheduler.rs
use crate::error::AppResult;
use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use log::{debug, error, info};
use std::future::Future;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Next local time at `hour:00` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, hour: u32) -> NaiveDateTime {
    let at = NaiveTime::from_hms_opt(hour.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Runs `job` once a day at `hour` local time until `shutdown` is cancelled.
/// A failed run is logged and the loop waits for the next day.
pub async fn run_daily<F, Fut>(hour: u32, shutdown: CancellationToken, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<()>>,
{
    info!("Starting daily sync loop ({:02}:00 local time)", hour);

    loop {
        let now = Local::now().naive_local();
        let next = next_run_after(now, hour);
        let wait = (next - now).to_std().unwrap_or_default();
        debug!("Next sync at {} (in {}s)", next, wait.as_secs());

        tokio::select! {
            _ = sleep(wait) => {}
            _ = shutdown.cancelled() => {
                info!("Shutdown signal received, stopping daily sync loop");
                break;
            }
        }

        if let Err(e) = job().await {
            error!("Scheduled sync failed: {}", e.to_safe_string());
        }
    }

    info!("Daily sync loop stopped gracefully");
}
