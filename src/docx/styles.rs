//! Read-only view of `word/styles.xml`.

use super::props::{read_spacing, RunFormat};
use super::xml::XmlElement;
use crate::model::ParagraphSpacing;

/// Maximum `basedOn` chain length followed when resolving a style.
const MAX_STYLE_DEPTH: usize = 16;

/// Style definitions of a document, possibly absent.
#[derive(Debug, Clone, Copy)]
pub struct StyleSheet<'a> {
    root: Option<&'a XmlElement>,
}

impl<'a> StyleSheet<'a> {
    /// Wrap a parsed `w:styles` element.
    pub fn new(root: Option<&'a XmlElement>) -> Self {
        Self { root }
    }

    /// Look up a style by `w:styleId`.
    pub fn style(&self, id: &str) -> Option<&'a XmlElement> {
        self.root?
            .children_named("style")
            .find(|s| s.attr("styleId") == Some(id))
    }

    /// The default paragraph style (usually "Normal").
    pub fn default_paragraph_style(&self) -> Option<&'a XmlElement> {
        self.root?.children_named("style").find(|s| {
            s.attr("type") == Some("paragraph")
                && matches!(s.attr("default"), Some("1" | "true" | "on"))
        })
    }

    /// Run formatting from `w:docDefaults`.
    pub fn default_run(&self) -> RunFormat {
        self.root
            .and_then(|r| r.find_path(&["docDefaults", "rPrDefault", "rPr"]))
            .map(RunFormat::from_properties)
            .unwrap_or_default()
    }

    /// Paragraph spacing from `w:docDefaults`, then the default paragraph style.
    pub fn default_spacing(&self) -> ParagraphSpacing {
        let doc_default = self
            .root
            .and_then(|r| r.find_path(&["docDefaults", "pPrDefault", "pPr", "spacing"]))
            .map(read_spacing)
            .unwrap_or_default();
        let style_default = self
            .default_paragraph_style()
            .map(|s| self.chain_spacing(s))
            .unwrap_or_default();
        style_default.or(doc_default)
    }

    /// Run formatting defined by a style and the styles it is based on.
    pub fn style_run(&self, id: &str) -> RunFormat {
        self.chain(self.style(id))
            .filter_map(|s| s.child("rPr"))
            .map(RunFormat::from_properties)
            .fold(RunFormat::default(), RunFormat::or)
    }

    /// Run formatting of the default paragraph style.
    pub fn default_style_run(&self) -> RunFormat {
        self.chain(self.default_paragraph_style())
            .filter_map(|s| s.child("rPr"))
            .map(RunFormat::from_properties)
            .fold(RunFormat::default(), RunFormat::or)
    }

    /// Spacing defined by a paragraph style, falling back to document defaults.
    pub fn style_spacing(&self, id: &str) -> ParagraphSpacing {
        match self.style(id) {
            Some(style) => self.chain_spacing(style).or(self.default_spacing()),
            None => self.default_spacing(),
        }
    }

    fn chain_spacing(&self, style: &'a XmlElement) -> ParagraphSpacing {
        self.chain(Some(style))
            .filter_map(|s| s.find_path(&["pPr", "spacing"]))
            .map(read_spacing)
            .fold(ParagraphSpacing::default(), ParagraphSpacing::or)
    }

    fn chain(&self, start: Option<&'a XmlElement>) -> impl Iterator<Item = &'a XmlElement> + 'a {
        let sheet = *self;
        std::iter::successors(start, move |s| {
            s.child("basedOn")
                .and_then(|b| b.attr("val"))
                .and_then(|id| sheet.style(id))
        })
        .take(MAX_STYLE_DEPTH)
    }
}
