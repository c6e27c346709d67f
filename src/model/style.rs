//! Style profile types.

use serde::{Deserialize, Serialize};

/// Baseline styling extracted from a template.
///
/// Built once per template load and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Font family for generated runs
    pub font_name: String,

    /// Font size in points (half-point resolution)
    pub font_size: f32,

    /// Spacing applied to generated table paragraphs
    pub paragraph_spacing: ParagraphSpacing,

    /// Widths of the three accounts-table columns in twips
    pub column_widths: [u32; 3],

    /// Border applied to the table and every cell
    pub border: BorderSpec,

    /// Header row height in twips, if the template sets one
    pub row_height: Option<u32>,
}

impl StyleProfile {
    /// Minimum height for generated rows in twips.
    pub fn min_row_height(&self) -> u32 {
        self.row_height
            .unwrap_or_else(|| ((self.font_size + 6.0) * 20.0).round() as u32)
    }

    /// Total width of the accounts table in twips.
    pub fn table_width(&self) -> u32 {
        self.column_widths.iter().sum()
    }
}

/// Convert a point size to the half-points stored in `w:sz`.
pub fn half_points(points: f32) -> u32 {
    (points * 2.0).round().max(1.0) as u32
}

/// Paragraph spacing as stored in `w:spacing`.
///
/// `before`/`after` are twips; `line` is in 240ths of a line when
/// `line_rule` is `auto`, twips otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphSpacing {
    /// Space before the paragraph
    pub before: Option<u32>,

    /// Space after the paragraph
    pub after: Option<u32>,

    /// Line spacing
    pub line: Option<u32>,

    /// Line rule (`auto`, `exact`, `atLeast`)
    pub line_rule: Option<String>,
}

impl ParagraphSpacing {
    /// Check whether no spacing value is set.
    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.after.is_none() && self.line.is_none()
    }

    /// Fill unset values from `other`.
    pub fn or(self, other: ParagraphSpacing) -> ParagraphSpacing {
        ParagraphSpacing {
            before: self.before.or(other.before),
            after: self.after.or(other.after),
            line: self.line.or(other.line),
            line_rule: self.line_rule.or(other.line_rule),
        }
    }
}

/// Border descriptor applied uniformly to tables and cells.
///
/// Templates encode borders inconsistently, so this is a fixed value rather
/// than something read from the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderSpec {
    /// Line style (`single`)
    pub style: String,

    /// Width in eighths of a point
    pub size: u32,

    /// Spacing in points
    pub space: u32,

    /// Hex color without `#`
    pub color: String,
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self {
            style: "single".to_string(),
            size: 8,
            space: 0,
            color: "000000".to_string(),
        }
    }
}

/// Caller-supplied typography used when a template has none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefaults {
    /// Fallback font family
    pub font_name: String,

    /// Fallback font size in points
    pub font_size: f32,
}

impl StyleDefaults {
    /// Create defaults with the given font.
    pub fn new(font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_name: font_name.into(),
            font_size,
        }
    }
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self::new("Bookman Old Style", 8.0)
    }
}
