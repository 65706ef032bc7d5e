// Status and reminder rules derived from an item's declarative attributes.

pub mod reminders;
pub mod status;

pub use reminders::{reminder_minutes, RenewalKind};
pub use status::{calculate_status, days_until, status_for_item};
