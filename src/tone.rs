//! Tone emphasis strategies.
//!
//! A notice can be emitted as-is (`formal`), with its warning paragraphs
//! made prominent (`urgent`), or with its courtesy paragraphs softened
//! (`friendly`). `auto` picks one of these from the template wording.

use crate::docx::{visit_paragraphs_mut, Document, RunFormat, XmlElement};
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Phrases that mark a template as urgent.
const URGENT_KEYWORDS: &[&str] = &["urgent", "immediate", "final notice", "last reminder"];

/// Phrases that mark a template as friendly.
const COURTESY_KEYWORDS: &[&str] = &["kindly", "please", "request", "cooperate"];

/// Paragraphs emphasized by the urgent strategy.
const WARNING_KEYWORDS: &[&str] = &["notice", "urgent"];

/// Dark red used for urgent emphasis.
const URGENT_COLOR: &str = "990000";

/// Emphasis mode applied to generated notices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Leave the template's emphasis untouched
    #[default]
    Formal,

    /// Bold dark-red warning paragraphs
    Urgent,

    /// Italic courtesy paragraphs
    Friendly,

    /// Choose from the template wording
    Auto,
}

impl Tone {
    /// Resolve `Auto` against a document; other tones are returned as-is.
    pub fn resolve(self, doc: &Document) -> Tone {
        match self {
            Tone::Auto => detect_tone(doc),
            tone => tone,
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tone::Formal => "formal",
            Tone::Urgent => "urgent",
            Tone::Friendly => "friendly",
            Tone::Auto => "auto",
        };
        f.write_str(name)
    }
}

impl FromStr for Tone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "formal" => Ok(Tone::Formal),
            "urgent" => Ok(Tone::Urgent),
            "friendly" => Ok(Tone::Friendly),
            "auto" => Ok(Tone::Auto),
            other => Err(Error::InvalidOption(format!(
                "unknown tone '{}' (expected formal, urgent, friendly or auto)",
                other
            ))),
        }
    }
}

/// Guess a tone from the document wording. Never returns `Auto`.
pub fn detect_tone(doc: &Document) -> Tone {
    let text = doc.plain_text().to_lowercase();
    if URGENT_KEYWORDS.iter().any(|k| text.contains(k)) {
        Tone::Urgent
    } else if COURTESY_KEYWORDS.iter().any(|k| text.contains(k)) {
        Tone::Friendly
    } else {
        Tone::Formal
    }
}

/// A way of emphasizing a finished notice.
pub trait EmphasisStrategy {
    /// Name of the strategy, as used on the command line.
    fn name(&self) -> &str;

    /// Apply emphasis and return the number of paragraphs changed.
    fn emphasize(&self, doc: &mut Document) -> usize;
}

/// Leaves the document untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormalEmphasis;

impl EmphasisStrategy for FormalEmphasis {
    fn name(&self) -> &str {
        "formal"
    }

    fn emphasize(&self, _doc: &mut Document) -> usize {
        0
    }
}

/// Bolds and colors paragraphs that mention a notice or urgency.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrgentEmphasis;

impl EmphasisStrategy for UrgentEmphasis {
    fn name(&self) -> &str {
        "urgent"
    }

    fn emphasize(&self, doc: &mut Document) -> usize {
        let format = RunFormat {
            bold: Some(true),
            color: Some(URGENT_COLOR.to_string()),
            ..Default::default()
        };
        format_matching(doc, WARNING_KEYWORDS, &format)
    }
}

/// Italicizes courtesy paragraphs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FriendlyEmphasis;

impl EmphasisStrategy for FriendlyEmphasis {
    fn name(&self) -> &str {
        "friendly"
    }

    fn emphasize(&self, doc: &mut Document) -> usize {
        let format = RunFormat {
            italic: Some(true),
            ..Default::default()
        };
        format_matching(doc, COURTESY_KEYWORDS, &format)
    }
}

/// The strategy for a tone, resolving `Auto` against the document.
pub fn strategy_for(tone: Tone, doc: &Document) -> Box<dyn EmphasisStrategy> {
    match tone.resolve(doc) {
        Tone::Urgent => Box::new(UrgentEmphasis),
        Tone::Friendly => Box::new(FriendlyEmphasis),
        Tone::Formal | Tone::Auto => Box::new(FormalEmphasis),
    }
}

/// Apply `format` to every run of paragraphs containing one of `keywords`.
fn format_matching(doc: &mut Document, keywords: &[&str], format: &RunFormat) -> usize {
    let mut changed = 0;
    visit_paragraphs_mut(doc.body_mut(), &mut |p| {
        let text = p.plain_text().to_lowercase();
        if keywords.iter().any(|k| text.contains(k)) && format_runs(p, format) > 0 {
            changed += 1;
        }
    });
    changed
}

fn format_runs(el: &mut XmlElement, format: &RunFormat) -> usize {
    let mut count = 0;
    for child in el.elements_mut() {
        if child.is("r") {
            format.apply(child);
            count += 1;
        } else if child.is("hyperlink") || child.is("smartTag") || child.is("ins") {
            count += format_runs(child, format);
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<w:p><w:r><w:t>NOTICE TO THE BANK</w:t></w:r></w:p><w:p><w:r><w:t>Kindly freeze the accounts below.</w:t></w:r></w:p><w:p><w:r><w:t>Regards</w:t></w:r></w:p>"#;

    fn run_format(doc: &Document, paragraph: usize) -> RunFormat {
        let (_, p) = doc.body_paragraphs().nth(paragraph).unwrap();
        RunFormat::from_run(p.child("r").unwrap())
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("Urgent".parse::<Tone>().unwrap(), Tone::Urgent);
        assert_eq!(" auto ".parse::<Tone>().unwrap(), Tone::Auto);
        assert!(matches!("loud".parse::<Tone>(), Err(Error::InvalidOption(_))));
        assert_eq!(Tone::Friendly.to_string(), "friendly");
        assert_eq!(Tone::default(), Tone::Formal);
    }

    #[test]
    fn test_formal_is_noop() {
        let mut doc = Document::from_body_xml(BODY, None).unwrap();
        let before = doc.body().clone();
        assert_eq!(strategy_for(Tone::Formal, &doc).emphasize(&mut doc), 0);
        assert_eq!(doc.body(), &before);
    }

    #[test]
    fn test_urgent_emphasis() {
        let mut doc = Document::from_body_xml(BODY, None).unwrap();
        let strategy = strategy_for(Tone::Urgent, &doc);
        assert_eq!(strategy.name(), "urgent");
        assert_eq!(strategy.emphasize(&mut doc), 1);

        let format = run_format(&doc, 0);
        assert_eq!(format.bold, Some(true));
        assert_eq!(format.color.as_deref(), Some("990000"));
        assert_eq!(run_format(&doc, 2), RunFormat::default());
    }

    #[test]
    fn test_friendly_emphasis() {
        let mut doc = Document::from_body_xml(BODY, None).unwrap();
        assert_eq!(FriendlyEmphasis.emphasize(&mut doc), 1);
        assert_eq!(run_format(&doc, 1).italic, Some(true));
        assert_eq!(run_format(&doc, 0).italic, None);
    }

    #[test]
    fn test_auto_detection() {
        let doc = Document::from_body_xml(BODY, None).unwrap();
        assert_eq!(detect_tone(&doc), Tone::Friendly);
        assert_eq!(strategy_for(Tone::Auto, &doc).name(), "friendly");

        let doc = Document::from_body_xml(
            r#"<w:p><w:r><w:t>Final Notice: immediate action</w:t></w:r></w:p>"#,
            None,
        )
        .unwrap();
        assert_eq!(Tone::Auto.resolve(&doc), Tone::Urgent);

        let doc = Document::from_body_xml(r#"<w:p><w:r><w:t>Dear Sir</w:t></w:r></w:p>"#, None).unwrap();
        assert_eq!(detect_tone(&doc), Tone::Formal);
    }
}
