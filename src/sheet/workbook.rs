//! JSON workbook files.
//!
//! A workbook holds named sheets. The first row of a sheet is its header:
//!
//! ```json
//! { "sheets": [ { "name": "SRE Deadlines", "rows": [ ["Name", "Type", ...], ["AWS Cert", ...] ] } ] }
//! ```
//!
//! Cells are `null`, booleans, numbers, strings or rich text objects
//! `{"text": "...", "runs": [{"text": "...", "link": "https://..."}]}`.

use crate::error::{AppError, AppResult};
use crate::models::Cell;
use crate::sheet::{apply_statuses, SheetSource};
use async_trait::async_trait;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    #[serde(default)]
    pub sheets: Vec<NamedSheet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedSheet {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Workbook {
    pub async fn load(path: &Path) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes through a sibling temp file so a crash never leaves a truncated workbook.
    pub async fn save(&self, path: &Path) -> AppResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn sheet(&self, name: &str) -> AppResult<&NamedSheet> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| self.missing_sheet(name))
    }

    pub fn sheet_mut(&mut self, name: &str) -> AppResult<&mut NamedSheet> {
        match self.sheets.iter().position(|s| s.name == name) {
            Some(index) => Ok(&mut self.sheets[index]),
            None => Err(self.missing_sheet(name)),
        }
    }

    fn missing_sheet(&self, name: &str) -> AppError {
        let available = self.sheet_names().join(", ");
        error!("Sheet \"{}\" not found. Available sheets: {}", name, available);
        AppError::sheet(format!(
            "Sheet \"{}\" not found. Available sheets: {}",
            name, available
        ))
    }
}

/// One named sheet of a workbook file.
#[derive(Debug, Clone)]
pub struct WorkbookSheet {
    path: PathBuf,
    sheet_name: String,
}

impl WorkbookSheet {
    pub fn new(path: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self { path: path.into(), sheet_name: sheet_name.into() }
    }
}

#[async_trait]
impl SheetSource for WorkbookSheet {
    async fn read_rows(&self) -> AppResult<Vec<Vec<Cell>>> {
        let workbook = Workbook::load(&self.path).await?;
        let sheet = workbook.sheet(&self.sheet_name)?;
        let rows: Vec<Vec<Cell>> = sheet.rows.iter().skip(1).cloned().collect();
        debug!("Read {} data rows from sheet \"{}\"", rows.len(), self.sheet_name);
        Ok(rows)
    }

    async fn write_statuses(&self, statuses: &[String]) -> AppResult<()> {
        let mut workbook = Workbook::load(&self.path).await?;
        let sheet = workbook.sheet_mut(&self.sheet_name)?;
        if sheet.rows.is_empty() {
            return apply_statuses(&mut [], statuses);
        }
        apply_statuses(&mut sheet.rows[1..], statuses)?;
        workbook.save(&self.path).await
    }
}
