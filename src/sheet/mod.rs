// Spreadsheet access. The reconciler reads data rows and writes the status column
// back through `SheetSource`; `WorkbookSheet` binds it to a JSON workbook file.

use crate::error::{AppError, AppResult};
use crate::models::item::COL_STATUS;
use crate::models::Cell;
use async_trait::async_trait;
use std::sync::Mutex;

pub mod workbook;

pub use workbook::{Workbook, WorkbookSheet};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Data rows in sheet order, header excluded.
    async fn read_rows(&self) -> AppResult<Vec<Vec<Cell>>>;

    /// Writes `statuses[i]` into the status column of data row `i`.
    async fn write_statuses(&self, statuses: &[String]) -> AppResult<()>;
}

/// Sets the status cell of every data row, padding short rows.
pub(crate) fn apply_statuses(rows: &mut [Vec<Cell>], statuses: &[String]) -> AppResult<()> {
    if statuses.len() > rows.len() {
        return Err(AppError::sheet(format!(
            "{} statuses for {} data rows",
            statuses.len(),
            rows.len()
        )));
    }

    for (row, status) in rows.iter_mut().zip(statuses) {
        if row.len() <= COL_STATUS {
            row.resize(COL_STATUS + 1, Cell::Empty);
        }
        row[COL_STATUS] = Cell::text(status);
    }
    Ok(())
}

/// Sheet held in memory.
#[derive(Debug, Default)]
pub struct MemorySheet {
    rows: Mutex<Vec<Vec<Cell>>>,
}

impl MemorySheet {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows: Mutex::new(rows) }
    }

    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.rows()
            .iter()
            .map(|row| row.get(COL_STATUS).map(Cell::display_text).unwrap_or_default())
            .collect()
    }

    pub fn set_row(&self, index: usize, row: Vec<Cell>) {
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
        if index < rows.len() {
            rows[index] = row;
        } else {
            rows.push(row);
        }
    }

    pub fn remove_row(&self, index: usize) {
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
        if index < rows.len() {
            rows.remove(index);
        }
    }
}

#[async_trait]
impl SheetSource for MemorySheet {
    async fn read_rows(&self) -> AppResult<Vec<Vec<Cell>>> {
        Ok(self.rows())
    }

    async fn write_statuses(&self, statuses: &[String]) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
        apply_statuses(&mut rows, statuses)
    }
}
