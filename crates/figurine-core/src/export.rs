//! Export settings and the exporter contract.
//!
//! Rasterizing or printing layers is left to an [`Exporter`] implementation
//! supplied by the host; this crate ships only [`NullExporter`].

use crate::geometry::union_bounds;
use crate::layers::{Layer, root_layers};
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ExportError {
    #[error("Export to {0} is not supported by this exporter")]
    Unsupported(ExportFormat),
    #[error("Nothing to export")]
    Empty,
    #[error("Export failed: {0}")]
    Other(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpg => "jpg",
            ExportFormat::Svg => "svg",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Raster formats honour scale and quality.
    pub fn is_raster(&self) -> bool {
        matches!(self, ExportFormat::Png | ExportFormat::Jpg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportScale {
    #[serde(rename = "0.5x")]
    Half,
    #[default]
    #[serde(rename = "1x")]
    One,
    #[serde(rename = "2x")]
    Two,
    #[serde(rename = "3x")]
    Three,
}

impl ExportScale {
    pub fn factor(&self) -> f64 {
        match self {
            ExportScale::Half => 0.5,
            ExportScale::One => 1.0,
            ExportScale::Two => 2.0,
            ExportScale::Three => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportQuality {
    #[default]
    High,
    Medium,
    Low,
}

impl ExportQuality {
    pub fn value(&self) -> f64 {
        match self {
            ExportQuality::High => 1.0,
            ExportQuality::Medium => 0.8,
            ExportQuality::Low => 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub scale: ExportScale,
    pub quality: ExportQuality,
    pub include_background: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            scale: ExportScale::One,
            quality: ExportQuality::High,
            include_background: true,
        }
    }
}

impl ExportSettings {
    pub fn file_name(&self, base: &str) -> String {
        format!("{}.{}", base, self.format.extension())
    }

    /// Output pixel size for `bounds`, `None` for vector formats.
    pub fn pixel_size(&self, bounds: Rect) -> Option<(u32, u32)> {
        if !self.format.is_raster() {
            return None;
        }
        let factor = self.scale.factor();
        Some((
            (bounds.width() * factor).ceil().max(1.0) as u32,
            (bounds.height() * factor).ceil().max(1.0) as u32,
        ))
    }
}

/// Area covered by the visible root layers.
pub fn export_bounds(layers: &[Layer]) -> Option<Rect> {
    union_bounds(root_layers(layers).into_iter().filter(|l| l.visible))
}

/// Turns the layer list into an encoded image or document.
pub trait Exporter {
    fn export(&self, layers: &[Layer], settings: &ExportSettings) -> Result<Vec<u8>, ExportError>;
}

/// Exporter that supports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullExporter;

impl Exporter for NullExporter {
    fn export(&self, layers: &[Layer], settings: &ExportSettings) -> Result<Vec<u8>, ExportError> {
        if export_bounds(layers).is_none() {
            return Err(ExportError::Empty);
        }
        log::warn!("No exporter available for {}", settings.format);
        Err(ExportError::Unsupported(settings.format))
    }
}
