//! Text layer properties.

use serde::{Deserialize, Serialize};

/// Default font family for new text layers.
pub const DEFAULT_FONT_FAMILY: &str = "Inter";
/// Default font size for new text layers.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Placeholder content for text created by a click.
pub const DEFAULT_TEXT: &str = "Type something";

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
}

impl FontWeight {
    /// CSS numeric weight.
    pub fn numeric(&self) -> u16 {
        match self {
            FontWeight::Light => 300,
            FontWeight::Regular => 400,
            FontWeight::Medium => 500,
            FontWeight::Semibold => 600,
            FontWeight::Bold => 700,
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontWeight::Light => "Light",
            FontWeight::Regular => "Regular",
            FontWeight::Medium => "Medium",
            FontWeight::Semibold => "Semi Bold",
            FontWeight::Bold => "Bold",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Fields carried only by text layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    /// The text content.
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_family")]
    pub font_family: String,
    #[serde(default = "default_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub text_align: TextAlign,
}

fn default_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_size() -> f64 {
    DEFAULT_FONT_SIZE
}

impl TextProps {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_family: default_family(),
            font_size: DEFAULT_FONT_SIZE,
            font_weight: FontWeight::default(),
            text_align: TextAlign::default(),
        }
    }

    /// Rough box size for the content.
    ///
    /// There is no shaping engine here; width assumes an average glyph advance
    /// of 0.6em and height one line per `\n`.
    pub fn estimated_size(&self) -> (f64, f64) {
        let lines: Vec<&str> = self.text.split('\n').collect();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let width = (longest as f64 * self.font_size * 0.6).max(self.font_size);
        let height = lines.len().max(1) as f64 * self.font_size * 1.2;
        (width, height)
    }
}
