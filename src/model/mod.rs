//! Data model for notice generation.
//!
//! Records and groups flow from ingestion into the assembler; a
//! `StyleProfile` carries what was learned from a template into the
//! table rewriter.

mod record;
mod style;

pub use record::{AccountRecord, OrganizationGroup};
pub use style::{half_points, BorderSpec, ParagraphSpacing, StyleDefaults, StyleProfile};
