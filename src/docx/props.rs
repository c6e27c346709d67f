//! Run, paragraph and cell properties.
//!
//! Readers return only what is set directly on an element; writers touch
//! only the properties that carry a value, inserting children in schema
//! order so the result stays valid for Word.

use super::xml::XmlElement;
use crate::model::{half_points, BorderSpec, ParagraphSpacing};

/// Child order of `w:rPr`.
pub const RPR_ORDER: &[&str] = &[
    "rStyle", "rFonts", "b", "bCs", "i", "iCs", "caps", "smallCaps", "strike", "dstrike",
    "outline", "shadow", "emboss", "imprint", "noProof", "snapToGrid", "vanish", "webHidden",
    "color", "spacing", "w", "kern", "position", "sz", "szCs", "highlight", "u", "effect", "bdr",
    "shd", "fitText", "vertAlign", "rtl", "cs", "em", "lang", "eastAsianLayout", "specVanish",
    "oMath",
];

/// Child order of `w:pPr`.
pub const PPR_ORDER: &[&str] = &[
    "pStyle", "keepNext", "keepLines", "pageBreakBefore", "framePr", "widowControl", "numPr",
    "suppressLineNumbers", "pBdr", "shd", "tabs", "suppressAutoHyphens", "kinsoku", "wordWrap",
    "overflowPunct", "topLinePunct", "autoSpaceDE", "autoSpaceDN", "bidi", "adjustRightInd",
    "snapToGrid", "spacing", "ind", "contextualSpacing", "mirrorIndents", "suppressOverlap", "jc",
    "textDirection", "textAlignment", "textboxTightWrap", "outlineLvl", "divId", "cnfStyle", "rPr",
    "sectPr", "pPrChange",
];

/// Child order of `w:tcPr`.
pub const TCPR_ORDER: &[&str] = &[
    "cnfStyle", "tcW", "gridSpan", "hMerge", "vMerge", "tcBorders", "shd", "noWrap", "tcMar",
    "textDirection", "tcFitText", "vAlign", "hideMark",
];

/// Child order of `w:trPr`.
pub const TRPR_ORDER: &[&str] = &[
    "cnfStyle", "divId", "gridBefore", "gridAfter", "wBefore", "wAfter", "cantSplit", "trHeight",
    "tblHeader", "tblCellSpacing", "jc", "hidden",
];

/// Child order of `w:tblPr`.
pub const TBLPR_ORDER: &[&str] = &[
    "tblStyle", "tblpPr", "tblOverlap", "bidiVisual", "tblStyleRowBandSize",
    "tblStyleColBandSize", "tblW", "jc", "tblCellSpacing", "tblInd", "tblBorders", "shd",
    "tblLayout", "tblCellMar", "tblLook",
];

/// Properties element first, everything else after.
pub const P_ORDER: &[&str] = &["pPr"];
pub const R_ORDER: &[&str] = &["rPr"];
pub const TC_ORDER: &[&str] = &["tcPr"];
pub const TR_ORDER: &[&str] = &["tblPrEx", "trPr"];
pub const TBL_ORDER: &[&str] = &["tblPr", "tblGrid"];

/// Edges bordered on a table.
pub const TABLE_EDGES: &[&str] = &["top", "left", "bottom", "right", "insideH", "insideV"];

/// Edges bordered on a cell.
pub const CELL_EDGES: &[&str] = &["top", "left", "bottom", "right"];

/// Margin applied to every accounts-table cell, in twips.
pub const CELL_MARGIN: u32 = 36;

/// Character formatting of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFormat {
    /// Font family
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Bold
    pub bold: Option<bool>,

    /// Italic
    pub italic: Option<bool>,

    /// Hex color without `#`
    pub color: Option<String>,
}

impl RunFormat {
    /// Read formatting from an `rPr` element.
    pub fn from_properties(rpr: &XmlElement) -> Self {
        let font_name = rpr.child("rFonts").and_then(|fonts| {
            ["ascii", "hAnsi"]
                .iter()
                .find_map(|key| fonts.attr(key))
                .map(str::to_string)
        });
        let font_size = rpr
            .child("sz")
            .and_then(|sz| sz.attr("val"))
            .and_then(|v| v.parse::<f32>().ok())
            .map(|sz| sz / 2.0);

        Self {
            font_name,
            font_size,
            bold: rpr.child("b").map(on_off),
            italic: rpr.child("i").map(on_off),
            color: rpr
                .child("color")
                .and_then(|c| c.attr("val"))
                .filter(|v| *v != "auto")
                .map(str::to_string),
        }
    }

    /// Read the direct formatting of a `w:r`.
    pub fn from_run(run: &XmlElement) -> Self {
        run.child("rPr")
            .map(Self::from_properties)
            .unwrap_or_default()
    }

    /// Fill unset values from `other`.
    pub fn or(self, other: RunFormat) -> RunFormat {
        RunFormat {
            font_name: self.font_name.or(other.font_name),
            font_size: self.font_size.or(other.font_size),
            bold: self.bold.or(other.bold),
            italic: self.italic.or(other.italic),
            color: self.color.or(other.color),
        }
    }

    /// Write the set values into a run's `rPr`.
    pub fn apply(&self, run: &mut XmlElement) {
        let rpr = run.get_or_create_child("rPr", R_ORDER);
        if let Some(ref font) = self.font_name {
            let fonts = ["ascii", "hAnsi", "cs", "eastAsia"]
                .iter()
                .fold(XmlElement::new("w:rFonts"), |el, key| {
                    el.with_attr(format!("w:{key}"), font.as_str())
                });
            rpr.set_child_ordered(fonts, RPR_ORDER);
        }
        if let Some(bold) = self.bold {
            rpr.set_child_ordered(toggle("w:b", bold), RPR_ORDER);
        }
        if let Some(italic) = self.italic {
            rpr.set_child_ordered(toggle("w:i", italic), RPR_ORDER);
        }
        if let Some(ref color) = self.color {
            rpr.set_child_ordered(XmlElement::new("w:color").with_attr("w:val", color.as_str()), RPR_ORDER);
        }
        if let Some(size) = self.font_size {
            let sz = half_points(size).to_string();
            rpr.set_child_ordered(XmlElement::new("w:sz").with_attr("w:val", sz.as_str()), RPR_ORDER);
            rpr.set_child_ordered(XmlElement::new("w:szCs").with_attr("w:val", sz), RPR_ORDER);
        }
    }
}

fn on_off(el: &XmlElement) -> bool {
    !matches!(el.attr("val"), Some("0" | "false" | "off"))
}

fn toggle(name: &str, on: bool) -> XmlElement {
    let el = XmlElement::new(name);
    if on {
        el
    } else {
        el.with_attr("w:val", "0")
    }
}

/// Paragraph-level formatting of a `w:p`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParagraphFormat {
    /// Paragraph style id (`w:pStyle`)
    pub style_id: Option<String>,

    /// Justification (`w:jc`)
    pub alignment: Option<String>,

    /// Spacing (`w:spacing`)
    pub spacing: ParagraphSpacing,

    /// Indentation, kept verbatim (`w:ind`)
    pub indent: Option<XmlElement>,
}

impl ParagraphFormat {
    /// Read formatting from a `pPr` element.
    pub fn from_properties(ppr: &XmlElement) -> Self {
        Self {
            style_id: ppr
                .child("pStyle")
                .and_then(|s| s.attr("val"))
                .map(str::to_string),
            alignment: ppr.child("jc").and_then(|j| j.attr("val")).map(str::to_string),
            spacing: ppr.child("spacing").map(read_spacing).unwrap_or_default(),
            indent: ppr.child("ind").cloned(),
        }
    }

    /// Read the direct formatting of a `w:p`.
    pub fn from_paragraph(paragraph: &XmlElement) -> Self {
        paragraph
            .child("pPr")
            .map(Self::from_properties)
            .unwrap_or_default()
    }

    /// Write the set values into a paragraph's `pPr`.
    pub fn apply(&self, paragraph: &mut XmlElement) {
        let ppr = paragraph.get_or_create_child("pPr", P_ORDER);
        if let Some(ref id) = self.style_id {
            ppr.set_child_ordered(XmlElement::new("w:pStyle").with_attr("w:val", id.as_str()), PPR_ORDER);
        }
        apply_spacing(ppr, &self.spacing);
        if let Some(ref indent) = self.indent {
            ppr.set_child_ordered(indent.clone(), PPR_ORDER);
        }
        if let Some(ref alignment) = self.alignment {
            ppr.set_child_ordered(XmlElement::new("w:jc").with_attr("w:val", alignment.as_str()), PPR_ORDER);
        }
    }
}

/// Read a `w:spacing` element.
pub fn read_spacing(spacing: &XmlElement) -> ParagraphSpacing {
    let num = |key: &str| spacing.attr(key).and_then(|v| v.parse::<u32>().ok());
    ParagraphSpacing {
        before: num("before"),
        after: num("after"),
        line: num("line"),
        line_rule: spacing.attr("lineRule").map(str::to_string),
    }
}

/// Write spacing into a `pPr`; does nothing when no value is set.
pub fn apply_spacing(ppr: &mut XmlElement, spacing: &ParagraphSpacing) {
    if spacing.is_empty() {
        return;
    }
    let mut el = XmlElement::new("w:spacing");
    if let Some(before) = spacing.before {
        el.set_attr("w:before", before.to_string());
    }
    if let Some(after) = spacing.after {
        el.set_attr("w:after", after.to_string());
    }
    if let Some(line) = spacing.line {
        el.set_attr("w:line", line.to_string());
        el.set_attr("w:lineRule", spacing.line_rule.as_deref().unwrap_or("auto"));
    }
    ppr.set_child_ordered(el, PPR_ORDER);
}

/// Build a border container (`w:tblBorders`, `w:tcBorders`) for the given edges.
pub fn border_element(container: &str, edges: &[&str], spec: &BorderSpec) -> XmlElement {
    edges.iter().fold(XmlElement::new(container), |el, edge| {
        el.with_child(
            XmlElement::new(format!("w:{edge}"))
                .with_attr("w:val", spec.style.as_str())
                .with_attr("w:sz", spec.size.to_string())
                .with_attr("w:space", spec.space.to_string())
                .with_attr("w:color", spec.color.as_str()),
        )
    })
}

/// Build a `w:tcMar` with the same margin on every side.
pub fn cell_margins(twips: u32) -> XmlElement {
    ["top", "left", "bottom", "right"]
        .iter()
        .fold(XmlElement::new("w:tcMar"), |el, side| {
            el.with_child(
                XmlElement::new(format!("w:{side}"))
                    .with_attr("w:w", twips.to_string())
                    .with_attr("w:type", "dxa"),
            )
        })
}

/// Build a `w:tcW` in twips.
pub fn cell_width(twips: u32) -> XmlElement {
    XmlElement::new("w:tcW")
        .with_attr("w:w", twips.to_string())
        .with_attr("w:type", "dxa")
}

/// Width of a cell in twips when stored as `dxa`.
pub fn read_cell_width(cell: &XmlElement) -> Option<u32> {
    let tcw = cell.find_path(&["tcPr", "tcW"])?;
    match tcw.attr("type") {
        None | Some("dxa") => tcw.attr("w")?.parse().ok().filter(|w| *w > 0),
        Some(_) => None,
    }
}

/// Set width, borders and margins on a `w:tc`.
pub fn format_cell(cell: &mut XmlElement, width: Option<u32>, border: &BorderSpec) {
    let tcpr = cell.get_or_create_child("tcPr", TC_ORDER);
    if let Some(width) = width {
        tcpr.set_child_ordered(cell_width(width), TCPR_ORDER);
    }
    tcpr.set_child_ordered(border_element("w:tcBorders", CELL_EDGES, border), TCPR_ORDER);
    tcpr.set_child_ordered(cell_margins(CELL_MARGIN), TCPR_ORDER);
}

/// Build a run carrying `text` with the given formatting.
pub fn text_run(text: &str, format: &RunFormat) -> XmlElement {
    let mut run = XmlElement::new("w:r");
    if *format != RunFormat::default() {
        format.apply(&mut run);
    }
    run.with_child(
        XmlElement::new("w:t")
            .with_attr("xml:space", "preserve")
            .with_text(text),
    )
}
