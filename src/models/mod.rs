// Declare modules
pub mod event;
pub mod item;
pub mod status;
pub mod sync;

// Re-export the public types so callers can use `crate::models::X`.
pub use event::CalendarEvent;
pub use item::{Cell, DeadlineItem, Expiry, Flag, Priority, RichText, TextRun};
pub use status::Status;
pub use sync::SyncReport;
