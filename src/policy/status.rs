// file: src/policy/status.rs
use crate::models::{DeadlineItem, Expiry, Flag, Status};
use chrono::{NaiveDate, NaiveDateTime};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Whole days from `now` until the start of `expiry`, rounded up.
pub fn days_until(expiry: NaiveDate, now: NaiveDateTime) -> i64 {
    let seconds = (expiry.and_time(chrono::NaiveTime::MIN) - now).num_seconds();
    let days = seconds.div_euclid(SECONDS_PER_DAY);
    if seconds.rem_euclid(SECONDS_PER_DAY) > 0 {
        days + 1
    } else {
        days
    }
}

pub fn calculate_status(
    expiry: NaiveDate,
    needs_manual_action: Flag,
    auto_renews: Flag,
    now: NaiveDateTime,
) -> Status {
    let days_left = days_until(expiry, now);
    let manual = needs_manual_action.is_set();
    let auto = auto_renews.is_set();

    if days_left < 0 {
        return Status::Expired;
    }

    if days_left <= 7 {
        return if manual {
            Status::ActionRequired
        } else {
            Status::ExpiringSoon
        };
    }

    if days_left <= 30 {
        return if manual {
            Status::ActionRequired
        } else if auto {
            Status::Monitoring
        } else {
            Status::ExpiringSoon
        };
    }

    if days_left <= 90 && manual {
        return Status::Monitoring;
    }

    Status::Active
}

/// Status label to store for a row: computed when the date is valid, otherwise the
/// previously stored label (or `Unknown`).
pub fn status_for_item(item: &DeadlineItem, now: NaiveDateTime) -> String {
    match item.expiry {
        Expiry::Date(date) => {
            calculate_status(date, item.manual_action(), item.auto_renew(), now).to_string()
        }
        Expiry::Missing | Expiry::Invalid(_) => {
            if item.status.trim().is_empty() {
                Status::Unknown.to_string()
            } else {
                item.status.clone()
            }
        }
    }
}
