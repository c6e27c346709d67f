//! Notice generation options.

use crate::model::StyleDefaults;
use crate::tone::Tone;
use std::path::PathBuf;

/// Default placeholder text replaced by the organization name.
pub const DEFAULT_PLACEHOLDER: &str = "ICICI BANK";

/// Default anchor phrase preceding the organization block.
pub const DEFAULT_ANCHOR: &str = "NODAL OFFICER";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "notices_output";

/// Options for notice generation.
#[derive(Debug, Clone)]
pub struct NoticeOptions {
    /// Directory receiving the generated notices
    pub output_dir: PathBuf,

    /// Template text replaced by the organization name
    pub placeholder: String,

    /// Phrase locating the organization block
    pub anchor: String,

    /// Emphasis mode
    pub tone: Tone,

    /// Font used when the template defines none
    pub style_defaults: StyleDefaults,
}

impl NoticeOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the anchor phrase.
    pub fn with_anchor(mut self, anchor: impl Into<String>) -> Self {
        self.anchor = anchor.into();
        self
    }

    /// Set the tone.
    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Set the fallback font family.
    pub fn with_font_name(mut self, name: impl Into<String>) -> Self {
        self.style_defaults.font_name = name.into();
        self
    }

    /// Set the fallback font size in points.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.style_defaults.font_size = size;
        self
    }
}

impl Default for NoticeOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            anchor: DEFAULT_ANCHOR.to_string(),
            tone: Tone::default(),
            style_defaults: StyleDefaults::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = NoticeOptions::default();
        assert_eq!(options.output_dir, PathBuf::from("notices_output"));
        assert_eq!(options.placeholder, "ICICI BANK");
        assert_eq!(options.anchor, "NODAL OFFICER");
        assert_eq!(options.tone, Tone::Formal);
        assert_eq!(options.style_defaults.font_name, "Bookman Old Style");
        assert_eq!(options.style_defaults.font_size, 8.0);
    }

    #[test]
    fn test_options_builder() {
        let options = NoticeOptions::new()
            .with_output_dir("out")
            .with_placeholder("XYZ BANK")
            .with_anchor("COMPLIANCE")
            .with_tone(Tone::Urgent)
            .with_font_name("Arial")
            .with_font_size(10.0);

        assert_eq!(options.output_dir, PathBuf::from("out"));
        assert_eq!(options.placeholder, "XYZ BANK");
        assert_eq!(options.anchor, "COMPLIANCE");
        assert_eq!(options.tone, Tone::Urgent);
        assert_eq!(options.style_defaults.font_name, "Arial");
        assert_eq!(options.style_defaults.font_size, 10.0);
    }
}
