//! Spreadsheet account listings (first worksheet only).

use super::{RecordSource, Rows};
use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

/// Reads Excel and OpenDocument workbooks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetSource;

impl SpreadsheetSource {
    /// Create a new spreadsheet source.
    pub fn new() -> Self {
        Self
    }
}

impl RecordSource for SpreadsheetSource {
    fn supported_extensions(&self) -> &[&str] {
        &["xlsx", "xlsm", "xlsb", "xls", "ods"]
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }

    fn read_rows(&self, path: &Path) -> Result<Rows> {
        let mut workbook =
            open_workbook_auto(path).map_err(|e| Error::Spreadsheet(e.to_string()))?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| Error::Spreadsheet(e.to_string()))?,
            None => {
                log::warn!("Workbook {} has no worksheets", path.display());
                return Ok(Vec::new());
            }
        };

        Ok(range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }
}

/// Render a cell as text. Whole-number floats drop their decimal part so
/// account numbers stored as numbers read back unchanged.
pub(crate) fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        _ => cell.to_string(),
    }
}
