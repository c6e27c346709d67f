//! `.docx` package loading and saving.

use super::styles::StyleSheet;
use super::xml::{visit_paragraphs, XmlElement, XmlNode};
use crate::error::{Error, Result};
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

const W_NAMESPACE: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// A raw zip entry.
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
}

/// An in-memory word-processing document.
///
/// The main document part is held as an element tree with the `w:body`
/// split out for direct access. Every other part is kept as raw bytes and
/// written back unchanged and in its original order.
#[derive(Debug, Clone)]
pub struct Document {
    parts: Vec<Part>,
    root: XmlElement,
    body: XmlElement,
    styles: Option<XmlElement>,
}

impl Document {
    /// Open a `.docx` file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Load a `.docx` package from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::InvalidTemplate(format!("not a docx package: {e}")))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut data = Vec::new();
            entry.read_to_end(&mut data)?;
            parts.push(Part { name, data });
        }

        let document = parts
            .iter()
            .find(|p| p.name == DOCUMENT_PART)
            .ok_or_else(|| Error::InvalidTemplate(format!("missing {DOCUMENT_PART}")))?;
        let root = XmlElement::parse(&document.data)?;

        let styles = match parts.iter().find(|p| p.name == STYLES_PART) {
            Some(part) => match XmlElement::parse(&part.data) {
                Ok(styles) => Some(styles),
                Err(e) => {
                    log::warn!("Ignoring unreadable {}: {}", STYLES_PART, e);
                    None
                }
            },
            None => None,
        };

        Self::assemble(parts, root, styles)
    }

    /// Build a document from raw part XML.
    ///
    /// The package gets minimal content types and relationships, which is
    /// enough for Word to open it.
    pub fn from_xml(document_xml: &str, styles_xml: Option<&str>) -> Result<Self> {
        let root = XmlElement::parse(document_xml.as_bytes())?;
        let styles = styles_xml
            .map(|xml| XmlElement::parse(xml.as_bytes()))
            .transpose()?;

        let mut parts = vec![
            Part {
                name: "[Content_Types].xml".to_string(),
                data: CONTENT_TYPES_XML.as_bytes().to_vec(),
            },
            Part {
                name: "_rels/.rels".to_string(),
                data: PACKAGE_RELS_XML.as_bytes().to_vec(),
            },
            Part {
                name: DOCUMENT_PART.to_string(),
                data: Vec::new(),
            },
        ];
        if let Some(xml) = styles_xml {
            parts.push(Part {
                name: "word/_rels/document.xml.rels".to_string(),
                data: DOCUMENT_RELS_XML.as_bytes().to_vec(),
            });
            parts.push(Part {
                name: STYLES_PART.to_string(),
                data: xml.as_bytes().to_vec(),
            });
        }

        Self::assemble(parts, root, styles)
    }

    /// Build a document from body XML (the content between `<w:body>` tags).
    pub fn from_body_xml(body_xml: &str, styles_xml: Option<&str>) -> Result<Self> {
        let document = format!(
            r#"<w:document xmlns:w="{W_NAMESPACE}"><w:body>{body_xml}</w:body></w:document>"#
        );
        Self::from_xml(&document, styles_xml)
    }

    fn assemble(
        parts: Vec<Part>,
        mut root: XmlElement,
        styles: Option<XmlElement>,
    ) -> Result<Self> {
        if !root.is("document") {
            return Err(Error::InvalidTemplate(format!(
                "unexpected root element <{}>",
                root.name
            )));
        }
        let body = root
            .child_mut("body")
            .map(|slot| {
                let name = slot.name.clone();
                std::mem::replace(slot, XmlElement::new(name))
            })
            .ok_or_else(|| Error::InvalidTemplate("document has no body".to_string()))?;

        Ok(Self {
            parts,
            root,
            body,
            styles,
        })
    }

    /// The `w:body` element.
    pub fn body(&self) -> &XmlElement {
        &self.body
    }

    /// The `w:body` element, mutably.
    pub fn body_mut(&mut self) -> &mut XmlElement {
        &mut self.body
    }

    /// Style definitions.
    pub fn style_sheet(&self) -> StyleSheet<'_> {
        StyleSheet::new(self.styles.as_ref())
    }

    /// Top-level paragraphs of the body with their child index.
    pub fn body_paragraphs(&self) -> impl Iterator<Item = (usize, &XmlElement)> {
        self.body
            .children
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match n {
                XmlNode::Element(el) if el.is("p") => Some((i, el)),
                _ => None,
            })
    }

    /// Top-level tables of the body.
    pub fn tables(&self) -> impl Iterator<Item = &XmlElement> {
        self.body.children_named("tbl")
    }

    /// Text of every paragraph in the body, one per line.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        visit_paragraphs(&self.body, &mut |p| lines.push(p.plain_text()));
        lines.join("\n")
    }

    /// Names of all parts in the package, in order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Raw bytes of an untouched part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    fn document_xml(&self) -> Result<Vec<u8>> {
        let mut root = self.root.clone();
        if let Some(slot) = root.child_mut("body") {
            *slot = self.body.clone();
        }
        root.to_xml_bytes()
    }

    /// Serialize the package.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let document_xml = self.document_xml()?;
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        for part in &self.parts {
            let options = if part.name.starts_with("word/media/") {
                stored
            } else {
                deflated
            };
            zip.start_file(part.name.as_str(), options)?;
            if part.name == DOCUMENT_PART {
                zip.write_all(&document_xml)?;
            } else {
                zip.write_all(&part.data)?;
            }
        }
        Ok(zip.finish()?.into_inner())
    }

    /// Write the package to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        fs::write(path, bytes).map_err(|source| Error::OutputWriteFailure {
            path: path.to_path_buf(),
            source,
        })
    }
}
