// file: src/content/title.rs
use crate::models::Flag;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

pub const AUTO_RENEWING_TAG: &str = "(Auto-Renewing)";
pub const MANUAL_ACTION_TAG: &str = "(MANUAL ACTION REQUIRED)";

lazy_static! {
    static ref AUTO_RENEWING_RE: Regex = Regex::new(r"\s*\(Auto-Renewing\)\s*").unwrap();
    static ref MANUAL_ACTION_RE: Regex = Regex::new(r"\s*\(MANUAL ACTION REQUIRED\)\s*").unwrap();
    static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
}

/// Title of a deadline event, e.g. `Certificate: AWS Cert EXPIRES (Auto-Renewing)`.
pub fn event_title(
    item_type: &str,
    name: &str,
    needs_manual_action: Flag,
    auto_renews: Flag,
) -> String {
    let tag = if auto_renews.is_set() {
        AUTO_RENEWING_TAG
    } else if needs_manual_action.is_set() {
        MANUAL_ACTION_TAG
    } else {
        ""
    };
    format!("{}: {} EXPIRES {}", item_type, name, tag)
        .trim_end()
        .to_string()
}

/// Canonical form of a title for identity comparison. Never shown to users.
pub fn normalize_event_title(title: &str) -> String {
    let stripped = AUTO_RENEWING_RE.replace_all(title, "");
    let stripped = MANUAL_ACTION_RE.replace_all(&stripped, "");
    WHITESPACE_RE
        .replace_all(&stripped, " ")
        .trim()
        .to_lowercase()
}

/// `Fri Mar 01 2024`
pub fn date_string(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// Identity of a deadline event across runs: normalized title plus date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey(String);

impl EventKey {
    pub fn new(title: &str, date: NaiveDate) -> Self {
        EventKey(format!("{}_{}", normalize_event_title(title), date_string(date)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_decorations() {
        assert_eq!(
            normalize_event_title("ACME: Cert EXPIRES (Auto-Renewing)"),
            normalize_event_title("acme: cert expires")
        );
        assert_eq!(
            normalize_event_title("Contract:  Lease   EXPIRES (MANUAL ACTION REQUIRED)"),
            "contract: lease expires"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "  Certificate:\tAWS Cert EXPIRES (Auto-Renewing)  ",
            "Domain: example.com (MANUAL ACTION REQUIRED) EXPIRES",
            "plain",
            "",
        ];
        for input in inputs {
            let once = normalize_event_title(input);
            assert_eq!(normalize_event_title(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_tag_in_middle_joins_neighbours() {
        // Surrounding whitespace goes with the tag.
        assert_eq!(normalize_event_title("a (Auto-Renewing) b"), "ab");
    }

    #[test]
    fn test_event_title_variants() {
        assert_eq!(
            event_title("License", "JetBrains", Flag::Yes, Flag::Yes),
            "License: JetBrains EXPIRES (Auto-Renewing)"
        );
        assert_eq!(
            event_title("License", "JetBrains", Flag::Yes, Flag::No),
            "License: JetBrains EXPIRES (MANUAL ACTION REQUIRED)"
        );
        assert_eq!(
            event_title("License", "JetBrains", Flag::Unspecified, Flag::No),
            "License: JetBrains EXPIRES"
        );
    }

    #[test]
    fn test_event_key_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let key = EventKey::new("Certificate: AWS Cert EXPIRES (Auto-Renewing)", date);
        assert_eq!(key.as_str(), "certificate: aws cert expires_Fri Mar 01 2024");
    }

    #[test]
    fn test_event_key_ignores_renewal_tag() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        assert_eq!(
            EventKey::new("Domain: x.io EXPIRES (Auto-Renewing)", date),
            EventKey::new("Domain: x.io EXPIRES (MANUAL ACTION REQUIRED)", date)
        );
    }
}
