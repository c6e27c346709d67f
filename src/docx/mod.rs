//! Word-processing document object layer.
//!
//! A `.docx` file is a zip package of XML parts. This module loads the
//! package into a [`Document`] whose body is an editable element tree, and
//! provides typed helpers for the properties the notice pipeline reads and
//! writes (run fonts, paragraph spacing, cell widths and borders).

mod package;
pub mod props;
mod styles;
mod xml;

pub use package::Document;
pub use props::{ParagraphFormat, RunFormat};
pub use styles::StyleSheet;
pub use xml::{visit_paragraphs, visit_paragraphs_mut, XmlElement, XmlNode};
