// file: src/models/status.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status written back to the sheet's status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Expired,
    ActionRequired,
    ExpiringSoon,
    Monitoring,
    Active,
    Unknown,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Expired => "Expired",
            Status::ActionRequired => "Action Required",
            Status::ExpiringSoon => "Expiring Soon",
            Status::Monitoring => "Monitoring",
            Status::Active => "Active",
            Status::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
