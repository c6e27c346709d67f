//! CSV account listings.

use super::{RecordSource, Rows};
use crate::error::Result;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads comma-separated files.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSource;

impl CsvSource {
    /// Create a new CSV source.
    pub fn new() -> Self {
        Self
    }

    /// Read all rows, header included, from any reader.
    ///
    /// Rows may have differing lengths; short rows are padded when
    /// records are built.
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Rows> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}

impl RecordSource for CsvSource {
    fn supported_extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn name(&self) -> &str {
        "csv"
    }

    fn read_rows(&self, path: &Path) -> Result<Rows> {
        let file = File::open(path)?;
        self.read_from(file)
    }
}
