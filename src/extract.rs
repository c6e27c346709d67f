//! Template style extraction.
//!
//! [`extract_style`] reads a template and derives the [`StyleProfile`] used
//! to format generated rows. Every value has a fallback chain so any
//! template yields a profile:
//!
//! | value | first choice | then | finally |
//! |---|---|---|---|
//! | font family/size | first body run with direct formatting | default paragraph style, document defaults | caller defaults |
//! | paragraph spacing | first data-row paragraph of the accounts table | document default spacing | none |
//! | column widths | header cell widths | table grid | even split of table/page width |
//!
//! Extraction never modifies the document.

use crate::docx::{props, Document, RunFormat, StyleSheet, XmlElement};
use crate::model::{BorderSpec, ParagraphSpacing, StyleDefaults, StyleProfile};
use crate::table::find_accounts_table;

/// Usable width of a Letter page with one-inch margins, in twips.
const DEFAULT_TEXT_WIDTH: u32 = 9360;

/// Derive a style profile from a template.
pub fn extract_style(doc: &Document, defaults: &StyleDefaults) -> StyleProfile {
    let sheet = doc.style_sheet();
    let table = find_accounts_table(doc.body());

    let baseline = body_baseline(doc)
        .or(sheet.default_style_run())
        .or(sheet.default_run());
    let font_name = baseline.font_name.unwrap_or_else(|| {
        log::debug!("No font in template, using {}", defaults.font_name);
        defaults.font_name.clone()
    });
    let font_size = baseline.font_size.unwrap_or_else(|| {
        log::debug!("No font size in template, using {}pt", defaults.font_size);
        defaults.font_size
    });

    let paragraph_spacing = table
        .and_then(|t| data_row_spacing(t, &sheet))
        .unwrap_or_else(|| sheet.default_spacing());

    let column_widths = table.and_then(explicit_widths).unwrap_or_else(|| {
        let total = table
            .and_then(table_width)
            .or_else(|| text_width(doc.body()))
            .unwrap_or(DEFAULT_TEXT_WIDTH);
        log::debug!("No explicit column widths, splitting {} twips evenly", total);
        even_widths(total)
    });

    let row_height = table.and_then(header_row_height);

    StyleProfile {
        font_name,
        font_size,
        paragraph_spacing,
        column_widths,
        border: BorderSpec::default(),
        row_height,
    }
}

/// Font family and size from the first body runs that set them directly.
fn body_baseline(doc: &Document) -> RunFormat {
    let mut found = RunFormat::default();
    for (_, paragraph) in doc.body_paragraphs() {
        for run in paragraph.children_named("r") {
            let format = RunFormat::from_run(run);
            if found.font_name.is_none() {
                found.font_name = format.font_name;
            }
            if found.font_size.is_none() {
                found.font_size = format.font_size;
            }
            if found.font_name.is_some() && found.font_size.is_some() {
                return found;
            }
        }
    }
    found
}

/// Spacing of the first paragraph in the first data row, if there is one.
fn data_row_spacing(table: &XmlElement, sheet: &StyleSheet<'_>) -> Option<ParagraphSpacing> {
    let paragraph = table
        .children_named("tr")
        .nth(1)?
        .child("tc")?
        .child("p")?;
    let direct = props::ParagraphFormat::from_paragraph(paragraph);
    let inherited = match direct.style_id {
        Some(ref id) => sheet.style_spacing(id),
        None => sheet.default_spacing(),
    };
    Some(direct.spacing.or(inherited))
}

/// Three explicit widths from the header cells, else from the grid.
fn explicit_widths(table: &XmlElement) -> Option<[u32; 3]> {
    let header = table.child("tr")?;
    let from_cells: Vec<u32> = header
        .children_named("tc")
        .filter_map(props::read_cell_width)
        .collect();
    if let Ok(widths) = <[u32; 3]>::try_from(from_cells) {
        return Some(widths);
    }

    let from_grid: Vec<u32> = table
        .child("tblGrid")?
        .children_named("gridCol")
        .filter_map(|col| col.attr("w")?.parse().ok())
        .filter(|w| *w > 0)
        .collect();
    <[u32; 3]>::try_from(from_grid).ok()
}

/// Preferred table width when stored in twips.
fn table_width(table: &XmlElement) -> Option<u32> {
    let tblw = table.find_path(&["tblPr", "tblW"])?;
    match tblw.attr("type") {
        Some("dxa") => tblw.attr("w")?.parse().ok().filter(|w| *w > 0),
        _ => None,
    }
}

/// Page width minus horizontal margins from the body's section properties.
fn text_width(body: &XmlElement) -> Option<u32> {
    let section = body.child("sectPr")?;
    let page: u32 = section.child("pgSz")?.attr("w")?.parse().ok()?;
    let margins = section.child("pgMar");
    let margin = |keys: [&str; 2]| -> u32 {
        margins
            .and_then(|m| keys.iter().find_map(|k| m.attr(k)))
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    page.checked_sub(margin(["left", "start"]) + margin(["right", "end"]))
        .filter(|w| *w > 0)
}

fn even_widths(total: u32) -> [u32; 3] {
    let base = total / 3;
    [base, base, total - 2 * base]
}

fn header_row_height(table: &XmlElement) -> Option<u32> {
    table
        .child("tr")?
        .find_path(&["trPr", "trHeight"])?
        .attr("val")?
        .parse()
        .ok()
        .filter(|h| *h > 0)
}
