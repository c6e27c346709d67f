//! Minimal XML element tree for editing WordprocessingML parts.
//!
//! Parts are parsed with `quick-xml` into an owned tree, mutated in place,
//! and written back. Element and attribute lookups match on local names so
//! templates that bind WordprocessingML to an unusual prefix still work;
//! elements created by this crate always use the `w:` prefix.

use crate::error::{Error, Result};
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// A child element
    Element(XmlElement),
    /// Character data (unescaped)
    Text(String),
    /// A CDATA section
    CData(String),
    /// A comment (raw)
    Comment(String),
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    /// Qualified name, e.g. `w:p`
    pub name: String,

    /// Attributes in document order (qualified name, unescaped value)
    pub attributes: Vec<(String, String)>,

    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

fn local(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, l)| l).unwrap_or(name)
}

impl XmlElement {
    /// Create an element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute and return self.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Add a child element and return self.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// Add a text node and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// Local part of the element name (`p` for `w:p`).
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// Check the element's local name.
    pub fn is(&self, local_name: &str) -> bool {
        self.local_name() == local_name
    }

    /// Look up an attribute by local name.
    pub fn attr(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| local(k) == local_name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any attribute with the same qualified name.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|n| match n {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|n| match n {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Iterate over child elements with the given local name.
    pub fn children_named<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.elements().filter(move |el| el.is(local_name))
    }

    /// Iterate mutably over child elements with the given local name.
    pub fn children_named_mut<'a>(
        &'a mut self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> + 'a {
        self.elements_mut().filter(move |el| el.is(local_name))
    }

    /// First child element with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&XmlElement> {
        self.elements().find(|el| el.is(local_name))
    }

    /// First child element with the given local name, mutably.
    pub fn child_mut(&mut self, local_name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|el| el.is(local_name))
    }

    /// Follow a path of local names through first-match children.
    pub fn find_path(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// The element stored at `children[index]`, if that node is an element.
    pub fn element_at(&self, index: usize) -> Option<&XmlElement> {
        match self.children.get(index) {
            Some(XmlNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// The element stored at `children[index]`, mutably.
    pub fn element_at_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        match self.children.get_mut(index) {
            Some(XmlNode::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Remove every child element with the given local name.
    ///
    /// Returns the number of elements removed.
    pub fn remove_children(&mut self, local_name: &str) -> usize {
        let before = self.children.len();
        self.children
            .retain(|n| !matches!(n, XmlNode::Element(el) if el.is(local_name)));
        before - self.children.len()
    }

    /// Insert `child` respecting a schema sequence.
    ///
    /// `order` lists local names in schema order. The child goes before the
    /// first existing element that ranks later or is not listed at all; an
    /// unlisted child is appended. Returns the index it was inserted at.
    pub fn insert_ordered(&mut self, child: XmlElement, order: &[&str]) -> usize {
        let rank = |name: &str| order.iter().position(|n| *n == name);
        let index = match rank(child.local_name()) {
            Some(own) => self
                .children
                .iter()
                .position(|n| match n {
                    XmlNode::Element(el) => rank(el.local_name()).map_or(true, |r| r > own),
                    _ => false,
                })
                .unwrap_or(self.children.len()),
            None => self.children.len(),
        };
        self.children.insert(index, XmlNode::Element(child));
        index
    }

    /// Replace the first child with the same local name, or insert in schema order.
    pub fn set_child_ordered(&mut self, child: XmlElement, order: &[&str]) {
        let existing = self
            .children
            .iter()
            .position(|n| matches!(n, XmlNode::Element(el) if el.is(child.local_name())));
        match existing {
            Some(index) => self.children[index] = XmlNode::Element(child),
            None => {
                self.insert_ordered(child, order);
            }
        }
    }

    /// Get the first child with the given local name, creating `w:<name>` if absent.
    pub fn get_or_create_child(&mut self, local_name: &str, order: &[&str]) -> &mut XmlElement {
        let existing = self
            .children
            .iter()
            .position(|n| matches!(n, XmlNode::Element(el) if el.is(local_name)));
        let index = match existing {
            Some(index) => index,
            None => self.insert_ordered(XmlElement::new(format!("w:{local_name}")), order),
        };
        match &mut self.children[index] {
            XmlNode::Element(el) => el,
            _ => unreachable!("index was taken from an element node"),
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![XmlNode::Text(text.into())];
    }

    /// Concatenated text of this element as a reader would see it.
    ///
    /// Collects `w:t` content, renders `w:tab` as a tab and `w:br`/`w:cr`
    /// as a newline, and ignores deleted text and field instructions.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let is_text = self.is("t");
        for child in &self.children {
            match child {
                XmlNode::Text(text) | XmlNode::CData(text) if is_text => out.push_str(text),
                XmlNode::Element(el) => match el.local_name() {
                    "tab" => out.push('\t'),
                    "br" | "cr" => out.push('\n'),
                    "delText" | "instrText" | "pPr" | "rPr" => {}
                    _ => el.collect_text(out),
                },
                _ => {}
            }
        }
    }

    /// Parse an XML part into its root element.
    pub fn parse(data: &[u8]) -> Result<XmlElement> {
        let mut reader = Reader::from_reader(data);
        let mut buf = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf).map_err(Error::xml)? {
                Event::Start(e) => stack.push(element_from_start(&e)?),
                Event::Empty(e) => {
                    let el = element_from_start(&e)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Text(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e.unescape().map_err(Error::xml)?;
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
                Event::CData(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e).into_owned();
                        parent.children.push(XmlNode::CData(text));
                    }
                }
                Event::Comment(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e).into_owned();
                        parent.children.push(XmlNode::Comment(text));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::Xml(format!("unclosed element <{}>", stack[stack.len() - 1].name)));
        }
        root.ok_or_else(|| Error::Xml("document has no root element".to_string()))
    }

    /// Serialize this element as a standalone XML part.
    pub fn to_xml_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(Error::xml)?;
        self.write_into(&mut writer)?;
        Ok(writer.into_inner())
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(Error::xml)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(Error::xml)?;
        for child in &self.children {
            match child {
                XmlNode::Element(el) => el.write_into(writer)?,
                XmlNode::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(Error::xml)?,
                XmlNode::CData(text) => writer
                    .write_event(Event::CData(BytesCData::new(text.as_str())))
                    .map_err(Error::xml)?,
                XmlNode::Comment(text) => writer
                    .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                    .map_err(Error::xml)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(Error::xml)?;
        Ok(())
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let mut el = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(Error::xml)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(Error::xml)?.into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, el: XmlElement) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(el)),
        None if root.is_none() => *root = Some(el),
        None => return Err(Error::Xml("multiple root elements".to_string())),
    }
    Ok(())
}

/// Walk every paragraph (`w:p`) under `root`, including table cells and
/// nested content, in document order.
pub fn visit_paragraphs(root: &XmlElement, f: &mut dyn FnMut(&XmlElement)) {
    for el in root.elements() {
        if el.is("p") {
            f(el);
        }
        visit_paragraphs(el, f);
    }
}

/// Mutable counterpart of [`visit_paragraphs`].
pub fn visit_paragraphs_mut(root: &mut XmlElement, f: &mut dyn FnMut(&mut XmlElement)) {
    for el in root.elements_mut() {
        if el.is("p") {
            f(el);
        }
        visit_paragraphs_mut(el, f);
    }
}
