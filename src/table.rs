//! Accounts table location and rewriting.

use crate::docx::props::{
    self, border_element, format_cell, RunFormat, TABLE_EDGES, TBLPR_ORDER, TBL_ORDER, TRPR_ORDER,
    TR_ORDER,
};
use crate::docx::{Document, XmlElement, XmlNode};
use crate::error::{Error, Result};
use crate::model::{AccountRecord, StyleProfile};

/// Check whether a table is the accounts table: a header row of three
/// cells mentioning both "account" and "ifsc".
pub fn is_accounts_table(table: &XmlElement) -> bool {
    let Some(header) = table.child("tr") else {
        return false;
    };
    if header.children_named("tc").count() != 3 {
        return false;
    }
    let text = header.plain_text().to_lowercase();
    text.contains("account") && text.contains("ifsc")
}

/// The first top-level accounts table, if any.
pub fn find_accounts_table(body: &XmlElement) -> Option<&XmlElement> {
    body.children_named("tbl").find(|t| is_accounts_table(t))
}

/// The first top-level accounts table, mutably.
pub fn locate_accounts_table(body: &mut XmlElement) -> Result<&mut XmlElement> {
    let index = body
        .children
        .iter()
        .position(|n| matches!(n, XmlNode::Element(el) if el.is("tbl") && is_accounts_table(el)))
        .ok_or(Error::TableNotFound)?;
    body.element_at_mut(index).ok_or(Error::TableNotFound)
}

/// Data rows of a table (every row after the header).
pub fn data_rows(table: &XmlElement) -> impl Iterator<Item = &XmlElement> {
    table.children_named("tr").skip(1)
}

/// Replace the data rows of the accounts table with one row per record.
pub fn rewrite_accounts_table(
    doc: &mut Document,
    profile: &StyleProfile,
    records: &[AccountRecord],
) -> Result<()> {
    let table = locate_accounts_table(doc.body_mut())?;
    rewrite_table(table, profile, records);
    Ok(())
}

/// Rewrite a table in place.
///
/// Keeps the header row, drops every other row, re-asserts widths and
/// borders, then appends one row per record in order.
pub fn rewrite_table(table: &mut XmlElement, profile: &StyleProfile, records: &[AccountRecord]) {
    let mut header_seen = false;
    table.children.retain(|n| match n {
        XmlNode::Element(el) if el.is("tr") => !std::mem::replace(&mut header_seen, true),
        _ => true,
    });

    let grid = profile
        .column_widths
        .iter()
        .fold(XmlElement::new("w:tblGrid"), |grid, w| {
            grid.with_child(XmlElement::new("w:gridCol").with_attr("w:w", w.to_string()))
        });
    table.set_child_ordered(grid, TBL_ORDER);

    let tbl_pr = table.get_or_create_child("tblPr", TBL_ORDER);
    tbl_pr.set_child_ordered(
        XmlElement::new("w:tblW")
            .with_attr("w:w", profile.table_width().to_string())
            .with_attr("w:type", "dxa"),
        TBLPR_ORDER,
    );
    tbl_pr.set_child_ordered(
        border_element("w:tblBorders", TABLE_EDGES, &profile.border),
        TBLPR_ORDER,
    );

    let header_font = RunFormat {
        font_name: Some(profile.font_name.clone()),
        font_size: Some(profile.font_size),
        bold: Some(true),
        ..Default::default()
    };
    if let Some(header) = table.child_mut("tr") {
        set_row_height(header, profile.min_row_height());
        for (idx, cell) in header.children_named_mut("tc").enumerate() {
            format_cell(cell, profile.column_widths.get(idx).copied(), &profile.border);
            for paragraph in cell.children_named_mut("p") {
                for run in paragraph.children_named_mut("r") {
                    header_font.apply(run);
                }
            }
        }
    }

    for record in records {
        table.children.push(XmlNode::Element(build_row(record, profile)));
    }
}

fn set_row_height(row: &mut XmlElement, twips: u32) {
    let tr_pr = row.get_or_create_child("trPr", TR_ORDER);
    tr_pr.set_child_ordered(
        XmlElement::new("w:trHeight")
            .with_attr("w:val", twips.to_string())
            .with_attr("w:hRule", "atLeast"),
        TRPR_ORDER,
    );
}

fn build_row(record: &AccountRecord, profile: &StyleProfile) -> XmlElement {
    let font = RunFormat {
        font_name: Some(profile.font_name.clone()),
        font_size: Some(profile.font_size),
        ..Default::default()
    };

    let mut row = XmlElement::new("w:tr");
    set_row_height(&mut row, profile.min_row_height());

    for (idx, value) in record.cells().iter().enumerate() {
        let mut paragraph = XmlElement::new("w:p");
        let ppr = paragraph.get_or_create_child("pPr", props::P_ORDER);
        props::apply_spacing(ppr, &profile.paragraph_spacing);
        if ppr.children.is_empty() {
            paragraph.remove_children("pPr");
        }
        paragraph.children.push(XmlNode::Element(props::text_run(value, &font)));

        let mut cell = XmlElement::new("w:tc");
        format_cell(&mut cell, Some(profile.column_widths[idx]), &profile.border);
        cell.children.push(XmlNode::Element(paragraph));

        row.children.push(XmlNode::Element(cell));
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BorderSpec, ParagraphSpacing};

    fn profile() -> StyleProfile {
        StyleProfile {
            font_name: "Bookman Old Style".to_string(),
            font_size: 8.0,
            paragraph_spacing: ParagraphSpacing {
                before: Some(0),
                after: Some(0),
                line: None,
                line_rule: None,
            },
            column_widths: [2500, 4360, 2500],
            border: BorderSpec::default(),
            row_height: None,
        }
    }

    fn table_with_rows(rows: usize) -> XmlElement {
        let mut xml = String::from(
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tr><w:tc><w:p><w:r><w:t>Account No</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Name</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>IFSC Code</w:t></w:r></w:p></w:tc></w:tr>"#,
        );
        for i in 0..rows {
            xml.push_str(&format!(
                r#"<w:tr><w:tc><w:p><w:r><w:t>old{i}</w:t></w:r></w:p></w:tc><w:tc/><w:tc/></w:tr>"#
            ));
        }
        xml.push_str("</w:tbl>");
        XmlElement::parse(xml.as_bytes()).unwrap()
    }

    fn records(n: usize) -> Vec<AccountRecord> {
        (0..n)
            .map(|i| AccountRecord::new(format!("10{i}"), format!("Holder {i}"), "ICIC0001234"))
            .collect()
    }

    #[test]
    fn test_detects_accounts_table() {
        assert!(is_accounts_table(&table_with_rows(0)));
        let other = XmlElement::parse(
            br#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Date</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        )
        .unwrap();
        assert!(!is_accounts_table(&other));
    }

    #[test]
    fn test_row_count_is_idempotent() {
        for existing in [0, 1, 5] {
            for n in [0, 1, 3] {
                let mut table = table_with_rows(existing);
                rewrite_table(&mut table, &profile(), &records(n));
                assert_eq!(table.children_named("tr").count(), n + 1);
                rewrite_table(&mut table, &profile(), &records(n));
                assert_eq!(table.children_named("tr").count(), n + 1);
            }
        }
    }

    #[test]
    fn test_rows_follow_record_order() {
        let mut table = table_with_rows(2);
        let recs = records(3);
        rewrite_table(&mut table, &profile(), &recs);

        let rows: Vec<String> = data_rows(&table)
            .map(|r| {
                r.children_named("tc")
                    .map(|c| c.plain_text())
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                "100|Holder 0|ICIC0001234",
                "101|Holder 1|ICIC0001234",
                "102|Holder 2|ICIC0001234"
            ]
        );
        assert_eq!(table.child("tr").unwrap().plain_text(), "Account NoNameIFSC Code");
    }

    #[test]
    fn test_generated_cells_carry_profile() {
        let mut table = table_with_rows(0);
        rewrite_table(&mut table, &profile(), &records(1));

        let row = data_rows(&table).next().unwrap();
        assert_eq!(
            row.find_path(&["trPr", "trHeight"]).unwrap().attr("hRule"),
            Some("atLeast")
        );
        let cells: Vec<&XmlElement> = row.children_named("tc").collect();
        assert_eq!(cells.len(), 3);
        for (cell, width) in cells.iter().zip(profile().column_widths) {
            assert_eq!(props::read_cell_width(cell), Some(width));
            assert!(cell.find_path(&["tcPr", "tcBorders", "bottom"]).is_some());
            let run = cell.find_path(&["p", "r"]).unwrap();
            let format = RunFormat::from_run(run);
            assert_eq!(format.font_name.as_deref(), Some("Bookman Old Style"));
            assert_eq!(format.font_size, Some(8.0));
            let spacing = cell.find_path(&["p", "pPr", "spacing"]).unwrap();
            assert_eq!(spacing.attr("after"), Some("0"));
        }
    }

    #[test]
    fn test_header_and_table_formatting() {
        let mut table = table_with_rows(3);
        rewrite_table(&mut table, &profile(), &records(1));

        let header = table.child("tr").unwrap();
        for (cell, width) in header.children_named("tc").zip(profile().column_widths) {
            assert_eq!(props::read_cell_width(cell), Some(width));
            assert!(cell.find_path(&["tcPr", "tcBorders", "top"]).is_some());
            let run = cell.find_path(&["p", "r"]).unwrap();
            assert_eq!(RunFormat::from_run(run).bold, Some(true));
        }

        let grid: Vec<&str> = table
            .child("tblGrid")
            .unwrap()
            .children_named("gridCol")
            .filter_map(|c| c.attr("w"))
            .collect();
        assert_eq!(grid, vec!["2500", "4360", "2500"]);

        let names: Vec<&str> = table.elements().map(|e| e.local_name()).collect();
        assert_eq!(&names[..3], &["tblPr", "tblGrid", "tr"]);
        let tbl_pr = table.child("tblPr").unwrap();
        assert!(tbl_pr.child("tblStyle").is_some());
        assert!(tbl_pr.find_path(&["tblBorders", "insideV"]).is_some());
    }

    #[test]
    fn test_missing_table() {
        let mut doc = Document::from_body_xml("<w:p/>", None).unwrap();
        let result = rewrite_accounts_table(&mut doc, &profile(), &records(1));
        assert!(matches!(result, Err(Error::TableNotFound)));
    }
}
