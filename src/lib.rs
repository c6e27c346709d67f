//! # noticegen
//!
//! Batch generation of per-bank notices from a Word template and an
//! account listing.
//!
//! Account rows are validated by routing code (IFSC), grouped by the bank
//! prefix of that code, and turned into one `.docx` notice per bank. Each
//! notice is the template with the bank's name substituted, its accounts
//! table rewritten with only that bank's rows, and the bank's name placed
//! under the anchor phrase, all in the template's own fonts and spacing.
//!
//! ## Quick Start
//!
//! ```no_run
//! use noticegen::{generate_notices, NoticeOptions};
//!
//! fn main() -> noticegen::Result<()> {
//!     let options = NoticeOptions::new().with_output_dir("notices");
//!     let report = generate_notices("accounts.xlsx", "template.docx", options)?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Style preservation**: fonts, spacing and column widths come from the template
//! - **Split-run safe**: placeholders typed across several runs are still replaced
//! - **Flexible input**: CSV, Excel and OpenDocument listings with loose header names
//! - **Per-group isolation**: one bad group never stops the others

pub mod anchor;
pub mod assemble;
pub mod docx;
pub mod error;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod placeholder;
pub mod routing;
pub mod table;
pub mod tone;

// Re-export commonly used types
pub use anchor::{has_anchor, place_org_below_anchor, AnchorPlacement};
pub use assemble::{GroupOutcome, GroupReport, GroupWarning, NoticeAssembler, NoticeOptions, RunReport};
pub use docx::Document;
pub use error::{Error, FailureKind, Result};
pub use extract::extract_style;
pub use ingest::{read_records, ColumnMap, SourceRegistry};
pub use model::{
    AccountRecord, BorderSpec, OrganizationGroup, ParagraphSpacing, StyleDefaults, StyleProfile,
};
pub use placeholder::replace_placeholder;
pub use routing::{group, is_valid_routing_code, partition, resolve_org_name, validate, Partition};
pub use table::{find_accounts_table, rewrite_accounts_table};
pub use tone::{EmphasisStrategy, Tone};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Generate one notice per bank from a listing file and a template.
///
/// # Arguments
///
/// * `data` - CSV or spreadsheet listing
/// * `template` - `.docx` template
/// * `options` - Generation options
///
/// # Example
///
/// ```no_run
/// use noticegen::{generate_notices, NoticeOptions, Tone};
///
/// let options = NoticeOptions::new().with_tone(Tone::Auto);
/// let report = generate_notices("accounts.csv", "template.docx", options).unwrap();
/// assert!(report.is_success());
/// ```
pub fn generate_notices<P, Q>(data: P, template: Q, options: NoticeOptions) -> Result<RunReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let records = read_records(data)?;
    let assembler = NoticeAssembler::from_template_path(template, options)?;
    assembler.run(records)
}

/// What a template offers to the notice pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInspection {
    /// Extracted style profile
    pub profile: StyleProfile,

    /// Whether a qualifying accounts table exists
    pub has_accounts_table: bool,

    /// Whether the anchor phrase occurs
    pub has_anchor: bool,

    /// Number of placeholder occurrences
    pub placeholder_count: usize,
}

/// Inspect a template without generating anything.
///
/// # Example
///
/// ```no_run
/// use noticegen::{inspect_template, NoticeOptions};
///
/// let inspection = inspect_template("template.docx", &NoticeOptions::default()).unwrap();
/// println!("{}", inspection.profile.font_name);
/// ```
pub fn inspect_template<P: AsRef<Path>>(
    template: P,
    options: &NoticeOptions,
) -> Result<TemplateInspection> {
    let doc = Document::open(template)?;
    Ok(inspect_document(&doc, options))
}

/// Inspect an already loaded template.
pub fn inspect_document(doc: &Document, options: &NoticeOptions) -> TemplateInspection {
    let mut scratch = doc.clone();
    let placeholder_count = replace_placeholder(&mut scratch, &options.placeholder, &options.placeholder);
    TemplateInspection {
        profile: extract_style(doc, &options.style_defaults),
        has_accounts_table: find_accounts_table(doc.body()).is_some(),
        has_anchor: has_anchor(doc, &options.anchor),
        placeholder_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_document() {
        let body = r#"<w:p><w:r><w:t>Dear ICICI BANK</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Account No</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>IFSC</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#;
        let doc = Document::from_body_xml(body, None).unwrap();
        let inspection = inspect_document(&doc, &NoticeOptions::default());
        assert!(inspection.has_accounts_table);
        assert!(!inspection.has_anchor);
        assert_eq!(inspection.placeholder_count, 1);
        assert_eq!(inspection.profile.font_name, "Bookman Old Style");
    }

    #[test]
    fn test_generate_notices_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = generate_notices(
            dir.path().join("missing.csv"),
            dir.path().join("missing.docx"),
            NoticeOptions::default().with_output_dir(dir.path()),
        );
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
