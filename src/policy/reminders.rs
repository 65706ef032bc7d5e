// file: src/policy/reminders.rs
use crate::models::{Flag, Priority};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Which reminder schedule family an item falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalKind {
    ManualAction,
    AutoRenewing,
    Neutral,
}

impl RenewalKind {
    /// Manual action takes precedence over auto-renew.
    pub fn from_flags(needs_manual_action: Flag, auto_renews: Flag) -> Self {
        if needs_manual_action.is_set() {
            RenewalKind::ManualAction
        } else if auto_renews.is_set() {
            RenewalKind::AutoRenewing
        } else {
            RenewalKind::Neutral
        }
    }
}

fn lead_days(kind: RenewalKind, priority: Priority) -> &'static [i64] {
    match (kind, priority) {
        (RenewalKind::ManualAction, Priority::High) => &[60, 30, 14, 7, 3, 1],
        (RenewalKind::ManualAction, Priority::Medium) => &[30, 14, 3],
        (RenewalKind::ManualAction, Priority::Low) => &[14, 7],
        // Auto-renewing items only need an awareness nudge.
        (RenewalKind::AutoRenewing, Priority::High) => &[7, 1],
        (RenewalKind::AutoRenewing, Priority::Medium) => &[7],
        (RenewalKind::AutoRenewing, Priority::Low) => &[3],
        (RenewalKind::Neutral, Priority::High) => &[30, 14, 7, 1],
        (RenewalKind::Neutral, Priority::Medium) => &[14, 3],
        (RenewalKind::Neutral, Priority::Low) => &[7],
    }
}

/// Reminder lead times in minutes, longest first. Replaces any existing reminders.
pub fn reminder_minutes(
    priority: Priority,
    needs_manual_action: Flag,
    auto_renews: Flag,
) -> Vec<i64> {
    let kind = RenewalKind::from_flags(needs_manual_action, auto_renews);
    lead_days(kind, priority)
        .iter()
        .map(|days| days * MINUTES_PER_DAY)
        .collect()
}
