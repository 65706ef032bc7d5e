// file: src/models/item.rs
use crate::content::title::{event_title, EventKey};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const COL_NAME: usize = 0;
pub const COL_TYPE: usize = 1;
pub const COL_EXPIRY: usize = 2;
pub const COL_OWNER: usize = 3;
pub const COL_STATUS: usize = 4;
pub const COL_MANUAL_ACTION: usize = 5;
pub const COL_AUTO_RENEWS: usize = 6;
pub const COL_NOTES: usize = 7;
pub const COL_PRIORITY: usize = 8;
pub const COL_LINKS: usize = 9;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// A run of text inside a rich-text cell, optionally hyperlinked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl TextRun {
    pub fn plain(text: &str) -> Self {
        Self { text: text.to_string(), link: None }
    }

    pub fn linked(text: &str, url: &str) -> Self {
        Self { text: text.to_string(), link: Some(url.to_string()) }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RichText {
    pub text: String,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

impl RichText {
    /// Builds a rich value whose text is the concatenation of its runs.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        let text = runs.iter().map(|r| r.text.as_str()).collect();
        Self { text, runs }
    }
}

/// One spreadsheet cell as stored in a workbook file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    Rich(RichText),
}

impl Cell {
    pub fn text(value: &str) -> Self {
        Cell::Text(value.to_string())
    }

    pub fn display_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
            Cell::Rich(rich) => rich.text.clone(),
        }
    }

    pub fn rich_text(&self) -> Option<&RichText> {
        match self {
            Cell::Rich(rich) => Some(rich),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.display_text().trim().is_empty()
    }
}

/// Tri-state sheet flag: "yes" (any case) is set, blank is unspecified, anything else is no.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Yes,
    No,
    Unspecified,
}

impl Flag {
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();
        if value.is_empty() {
            Flag::Unspecified
        } else if value.eq_ignore_ascii_case("yes") {
            Flag::Yes
        } else {
            Flag::No
        }
    }

    pub fn is_set(self) -> bool {
        self == Flag::Yes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Unrecognized or blank values fall back to `Low`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expiry {
    Missing,
    Invalid(String),
    Date(NaiveDate),
}

impl Expiry {
    pub fn from_cell(cell: &Cell) -> Self {
        if cell.is_blank() {
            return Expiry::Missing;
        }
        match cell {
            Cell::Text(_) | Cell::Rich(_) => {
                let raw = cell.display_text();
                match parse_date(raw.trim()) {
                    Some(date) => Expiry::Date(date),
                    None => Expiry::Invalid(raw),
                }
            }
            other => Expiry::Invalid(other.display_text()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Expiry::Date(date) => Some(*date),
            _ => None,
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}

/// One data row of the deadline sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadlineItem {
    /// Sheet row number, counting the header as row 1.
    pub row_number: usize,
    pub name: String,
    pub item_type: String,
    pub expiry: Expiry,
    pub owner: String,
    pub status: String,
    pub needs_manual_action: String,
    pub auto_renews: String,
    pub renewal_notes: String,
    pub renewal_notes_rich: Option<RichText>,
    pub priority: String,
    pub links: String,
    pub links_rich: Option<RichText>,
}

impl DeadlineItem {
    /// Reads a data row; `index` is zero-based over data rows (header excluded).
    pub fn from_row(index: usize, row: &[Cell]) -> Self {
        let empty = Cell::Empty;
        let cell = |col: usize| row.get(col).unwrap_or(&empty);

        Self {
            row_number: index + 2,
            name: cell(COL_NAME).display_text(),
            item_type: cell(COL_TYPE).display_text(),
            expiry: Expiry::from_cell(cell(COL_EXPIRY)),
            owner: cell(COL_OWNER).display_text(),
            status: cell(COL_STATUS).display_text(),
            needs_manual_action: cell(COL_MANUAL_ACTION).display_text(),
            auto_renews: cell(COL_AUTO_RENEWS).display_text(),
            renewal_notes: cell(COL_NOTES).display_text(),
            renewal_notes_rich: cell(COL_NOTES).rich_text().cloned(),
            priority: cell(COL_PRIORITY).display_text(),
            links: cell(COL_LINKS).display_text(),
            links_rich: cell(COL_LINKS).rich_text().cloned(),
        }
    }

    pub fn manual_action(&self) -> Flag {
        Flag::parse(&self.needs_manual_action)
    }

    pub fn auto_renew(&self) -> Flag {
        Flag::parse(&self.auto_renews)
    }

    pub fn priority_level(&self) -> Priority {
        Priority::parse(&self.priority)
    }

    pub fn expiry_date(&self) -> Option<NaiveDate> {
        self.expiry.date()
    }

    /// Display title of this item's calendar event.
    pub fn title(&self) -> String {
        event_title(
            &self.item_type,
            &self.name,
            self.manual_action(),
            self.auto_renew(),
        )
    }

    /// Checks the fields a calendar upsert needs and returns the expiry date.
    pub fn syncable_date(&self) -> AppResult<NaiveDate> {
        if self.name.trim().is_empty() {
            return Err(AppError::missing_field(format!(
                "row {} has no item name",
                self.row_number
            )));
        }
        match &self.expiry {
            Expiry::Missing => Err(AppError::missing_field(format!(
                "row {} ({}) has no expiry date",
                self.row_number, self.name
            ))),
            Expiry::Invalid(raw) => Err(AppError::invalid_date(format!(
                "row {} ({}): '{}'",
                self.row_number, self.name, raw
            ))),
            Expiry::Date(date) => Ok(*date),
        }
    }

    pub fn event_key(&self) -> Option<EventKey> {
        self.expiry_date()
            .map(|date| EventKey::new(&self.title(), date))
    }
}

impl fmt::Display for DeadlineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expiry = match &self.expiry {
            Expiry::Date(date) => date.to_string(),
            Expiry::Invalid(raw) => raw.clone(),
            Expiry::Missing => "?".to_string(),
        };
        let manual = if self.needs_manual_action.is_empty() {
            "N/A"
        } else {
            &self.needs_manual_action
        };
        write!(
            f,
            "{} ({}) - Expiry/Due: {} - Owner: {} - Manual Action: {}",
            self.name, self.item_type, expiry, self.owner, manual
        )
    }
}
