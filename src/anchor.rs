//! Organization block placement below the anchor phrase.
//!
//! Templates carry a fixed phrase such as "NODAL OFFICER" followed by the
//! block where the organization name belongs. The paragraph after the
//! anchor is rewritten with the organization name, keeping that paragraph's
//! own style so the block looks as the template author laid it out.

use crate::docx::{props, Document, ParagraphFormat, RunFormat, StyleSheet, XmlElement, XmlNode};
use crate::error::{Error, Result};
use crate::model::StyleProfile;
use serde::{Deserialize, Serialize};

/// Where the organization name was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPlacement {
    /// A body paragraph, by index among the body's children
    Paragraph {
        /// Child index of the target paragraph
        index: usize,
    },
    /// A table cell directly below the cell holding the anchor
    TableCell {
        /// Row index within the table
        row: usize,
        /// Column index within the row
        column: usize,
    },
}

/// Formatting captured from the target before it is rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
struct ResolvedStyle {
    paragraph: ParagraphFormat,
    run: RunFormat,
}

/// Write `org_name` into the paragraph that follows the anchor phrase.
///
/// The anchor match is case-insensitive. Tables between the anchor and the
/// next paragraph are skipped. When no body paragraph carries the anchor,
/// a table cell holding it is accepted and the cell below it in the same
/// column becomes the target.
pub fn place_org_below_anchor(
    doc: &mut Document,
    anchor: &str,
    org_name: &str,
    profile: &StyleProfile,
) -> Result<AnchorPlacement> {
    let needle = anchor.trim().to_lowercase();
    if needle.is_empty() {
        return Err(Error::AnchorNotFound(anchor.to_string()));
    }

    if let Some(placement) = place_in_body(doc, anchor, &needle, org_name, profile)? {
        return Ok(placement);
    }
    if let Some(placement) = place_in_table(doc, &needle, org_name, profile) {
        log::debug!("Anchor '{}' found in a table cell", anchor);
        return Ok(placement);
    }
    Err(Error::AnchorNotFound(anchor.to_string()))
}

/// Check whether any body paragraph or table cell carries the anchor phrase.
pub fn has_anchor(doc: &Document, anchor: &str) -> bool {
    let needle = anchor.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let mut found = false;
    crate::docx::visit_paragraphs(doc.body(), &mut |p| {
        found = found || contains_anchor(p, &needle);
    });
    found
}

fn contains_anchor(el: &XmlElement, needle: &str) -> bool {
    el.plain_text().to_lowercase().contains(needle)
}

/// Body-level search. `Ok(None)` means the anchor is not in any body
/// paragraph; an anchor in the last paragraph is an error.
fn place_in_body(
    doc: &mut Document,
    anchor: &str,
    needle: &str,
    org_name: &str,
    profile: &StyleProfile,
) -> Result<Option<AnchorPlacement>> {
    let sheet = doc.style_sheet();
    let paragraphs: Vec<(usize, &XmlElement)> = doc.body_paragraphs().collect();
    let Some(position) = paragraphs.iter().position(|(_, p)| contains_anchor(p, needle)) else {
        return Ok(None);
    };
    let Some(&(index, target)) = paragraphs.get(position + 1) else {
        log::debug!("Anchor '{}' is the last paragraph of the body", anchor);
        return Err(Error::AnchorNotFound(anchor.to_string()));
    };
    let style = resolve_style(target, &sheet, profile);

    let paragraph = doc
        .body_mut()
        .element_at_mut(index)
        .ok_or_else(|| Error::AnchorNotFound(anchor.to_string()))?;
    write_paragraph(paragraph, &style, org_name);
    Ok(Some(AnchorPlacement::Paragraph { index }))
}

/// Table-cell fallback.
fn place_in_table(
    doc: &mut Document,
    needle: &str,
    org_name: &str,
    profile: &StyleProfile,
) -> Option<AnchorPlacement> {
    let sheet = doc.style_sheet();
    let (table_index, row, column, style) = doc
        .body()
        .children
        .iter()
        .enumerate()
        .find_map(|(i, node)| match node {
            XmlNode::Element(table) if table.is("tbl") => {
                let (row, column) = anchor_cell(table, needle)?;
                let below = table.children_named("tr").nth(row + 1)?;
                let cell = below.children_named("tc").nth(column)?;
                let style = cell
                    .child("p")
                    .map(|p| resolve_style(p, &sheet, profile))
                    .unwrap_or_else(|| baseline_style(profile));
                Some((i, row + 1, column, style))
            }
            _ => None,
        })?;

    let cell = doc
        .body_mut()
        .element_at_mut(table_index)?
        .children_named_mut("tr")
        .nth(row)?
        .children_named_mut("tc")
        .nth(column)?;
    if cell.child("p").is_none() {
        cell.children.push(XmlNode::Element(XmlElement::new("w:p")));
    }
    for paragraph in cell.children_named_mut("p") {
        write_paragraph(paragraph, &style, org_name);
    }
    Some(AnchorPlacement::TableCell { row, column })
}

/// Row and column of the first cell whose text carries the anchor.
fn anchor_cell(table: &XmlElement, needle: &str) -> Option<(usize, usize)> {
    table.children_named("tr").enumerate().find_map(|(r, row)| {
        row.children_named("tc")
            .position(|cell| contains_anchor(cell, needle))
            .map(|c| (r, c))
    })
}

/// Capture the paragraph's properties and the run formatting a reader
/// sees: direct run formatting, then the paragraph style, then the
/// template baseline font.
fn resolve_style(paragraph: &XmlElement, sheet: &StyleSheet<'_>, profile: &StyleProfile) -> ResolvedStyle {
    let format = ParagraphFormat::from_paragraph(paragraph);

    let direct = paragraph
        .children_named("r")
        .map(RunFormat::from_run)
        .fold(RunFormat::default(), RunFormat::or);
    let inherited = match format.style_id {
        Some(ref id) => sheet.style_run(id),
        None => sheet.default_style_run(),
    };
    let resolved = direct.or(inherited);

    ResolvedStyle {
        paragraph: format,
        run: RunFormat {
            font_name: resolved.font_name.or_else(|| Some(profile.font_name.clone())),
            font_size: resolved.font_size.or(Some(profile.font_size)),
            bold: resolved.bold,
            ..Default::default()
        },
    }
}

fn baseline_style(profile: &StyleProfile) -> ResolvedStyle {
    ResolvedStyle {
        paragraph: ParagraphFormat::default(),
        run: RunFormat {
            font_name: Some(profile.font_name.clone()),
            font_size: Some(profile.font_size),
            ..Default::default()
        },
    }
}

/// Replace a paragraph's content with one run, keeping its `pPr`.
fn write_paragraph(paragraph: &mut XmlElement, style: &ResolvedStyle, text: &str) {
    paragraph
        .children
        .retain(|n| matches!(n, XmlNode::Element(el) if el.is("pPr")));
    if style.paragraph != ParagraphFormat::default() {
        style.paragraph.apply(paragraph);
    }
    paragraph
        .children
        .push(XmlNode::Element(props::text_run(text, &style.run)));
}
