//! Account listing ingestion.
//!
//! Listings come as CSV or spreadsheet files whose first row is a header.
//! Sources are registered by file extension and produce raw rows; the
//! required columns are then located by [`ColumnMap`] and every data row
//! becomes an [`AccountRecord`].
//!
//! # Example
//!
//! ```no_run
//! use noticegen::ingest::SourceRegistry;
//! use std::path::Path;
//!
//! fn main() -> noticegen::Result<()> {
//!     let registry = SourceRegistry::with_defaults();
//!     let records = registry.read_records(Path::new("accounts.xlsx"))?;
//!     println!("{} records", records.len());
//!     Ok(())
//! }
//! ```

mod columns;
mod delimited;
mod spreadsheet;

pub use columns::{ColumnMap, Field};
pub use delimited::CsvSource;
pub use spreadsheet::SpreadsheetSource;

use crate::error::{Error, Result};
use crate::model::AccountRecord;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Raw cell text, header row first.
pub type Rows = Vec<Vec<String>>;

/// A file format that account listings can be read from.
///
/// Implement this trait to accept another listing format.
pub trait RecordSource: Send + Sync {
    /// Lowercase file extensions without the leading dot.
    fn supported_extensions(&self) -> &[&str];

    /// Name of this source.
    fn name(&self) -> &str;

    /// Read every row of the listing, header included.
    fn read_rows(&self, path: &Path) -> Result<Rows>;

    /// Check if this source handles the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry mapping file extensions to record sources.
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn RecordSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sources: HashMap::new(),
        }
    }

    /// Create a registry with the CSV and spreadsheet sources.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CsvSource::new()));
        registry.register(Arc::new(SpreadsheetSource::new()));
        registry
    }

    /// Register a source for all its extensions.
    pub fn register(&mut self, source: Arc<dyn RecordSource>) {
        for ext in source.supported_extensions() {
            self.sources.insert(ext.to_lowercase(), source.clone());
        }
    }

    /// Get the source for a file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn RecordSource>> {
        self.sources.get(&ext.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.sources.contains_key(&ext.to_lowercase())
    }

    /// Read account records from a listing file.
    pub fn read_records(&self, path: &Path) -> Result<Vec<AccountRecord>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedInput(format!("{} has no extension", path.display())))?;

        let source = self
            .get_by_extension(ext)
            .ok_or_else(|| Error::UnsupportedInput(format!("no reader for .{}", ext)))?;

        log::debug!("Reading {} with the {} source", path.display(), source.name());
        records_from_rows(source.read_rows(path)?)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Read account records with the default sources.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<AccountRecord>> {
    SourceRegistry::with_defaults().read_records(path.as_ref())
}

/// Build records from raw rows whose first row is the header.
///
/// Rows with every cell blank are skipped. Each record remembers its
/// 1-based row in the listing.
pub fn records_from_rows(rows: Rows) -> Result<Vec<AccountRecord>> {
    let mut rows = rows.into_iter();
    let header = rows.next().unwrap_or_default();
    let columns = ColumnMap::detect(&header)?;

    let cell = |row: &[String], idx: usize| row.get(idx).cloned().unwrap_or_default();
    let records: Vec<AccountRecord> = rows
        .enumerate()
        .filter(|(_, row)| row.iter().any(|c| !c.trim().is_empty()))
        .map(|(i, row)| {
            AccountRecord::new(
                cell(&row, columns.account_number),
                cell(&row, columns.holder_name),
                cell(&row, columns.routing_code),
            )
            .with_line(i + 2)
        })
        .collect();

    log::info!("Read {} account records", records.len());
    Ok(records)
}
