//! Error types for noticegen library.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for noticegen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while generating notices.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading input files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The template package could not be read or written as a zip archive.
    #[error("Zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed XML inside a document part.
    #[error("XML error: {0}")]
    Xml(String),

    /// The template is not a usable word-processing document.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// A record was rejected by routing code or field validation.
    #[error("Record on line {line} fails validation: {reason}")]
    FailsValidation {
        /// 1-based source row of the record
        line: usize,
        /// Why the record was rejected
        reason: String,
    },

    /// The template has no table whose header mentions "account" and "ifsc".
    #[error("Accounts table not found: no 3-column table with 'account' and 'ifsc' in its header")]
    TableNotFound,

    /// The anchor phrase is missing or has no paragraph after it.
    #[error("Anchor not found: no paragraph follows '{0}'")]
    AnchorNotFound(String),

    /// A generated notice could not be written.
    #[error("Failed to write {}: {source}", .path.display())]
    OutputWriteFailure {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The output directory could not be created.
    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDirectory {
        /// Requested directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// CSV decoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet decoding error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// The input file format is not supported.
    #[error("Unsupported input format: {0}")]
    UnsupportedInput(String),

    /// The input header row lacks one of the required columns.
    #[error(
        "Required columns not found (account number, account name, IFSC); available columns: {}",
        .available.join(", ")
    )]
    MissingColumns {
        /// Header names present in the input
        available: Vec<String>,
    },

    /// An option value could not be parsed.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

impl Error {
    /// Classify the error for per-group reporting.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Error::TableNotFound => FailureKind::TableNotFound,
            Error::AnchorNotFound(_) => FailureKind::AnchorNotFound,
            Error::OutputWriteFailure { .. } => FailureKind::OutputWriteFailure,
            Error::Io(_) | Error::Zip(_) | Error::Xml(_) | Error::InvalidTemplate(_) => {
                FailureKind::Template
            }
            _ => FailureKind::Other,
        }
    }

    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Error::Xml(err.to_string())
    }
}

/// Coarse classification of a per-group failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No qualifying accounts table in the template
    TableNotFound,
    /// Anchor phrase missing or last paragraph
    AnchorNotFound,
    /// The output file could not be written
    OutputWriteFailure,
    /// The template could not be parsed or serialized
    Template,
    /// Anything else
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::AnchorNotFound("NODAL OFFICER".to_string());
        assert_eq!(
            err.to_string(),
            "Anchor not found: no paragraph follows 'NODAL OFFICER'"
        );

        let err = Error::MissingColumns {
            available: vec!["Name".to_string(), "Code".to_string()],
        };
        assert!(err.to_string().ends_with("available columns: Name, Code"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_failure_kind() {
        assert_eq!(Error::TableNotFound.failure_kind(), FailureKind::TableNotFound);
        let err = Error::OutputWriteFailure {
            path: PathBuf::from("out.docx"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "locked"),
        };
        assert_eq!(err.failure_kind(), FailureKind::OutputWriteFailure);
        assert!(err.to_string().contains("out.docx"));
    }
}
