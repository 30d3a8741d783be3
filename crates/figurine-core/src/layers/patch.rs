//! Partial layer updates.

use super::{FontWeight, Layer, LayerKind, SerializableColor, Shadow, TextAlign, VectorPoint};
use serde::{Deserialize, Serialize};

/// A set of optional field overrides, shallow-merged into a layer.
///
/// Type-specific fields only apply when the target layer has the matching
/// variant; they are ignored otherwise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub fill: Option<SerializableColor>,
    pub stroke: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub name: Option<String>,
    pub opacity: Option<f64>,
    pub blur: Option<f64>,
    pub shadow: Option<Shadow>,
    // rectangle
    pub corner_radius: Option<f64>,
    // text
    pub text: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub text_align: Option<TextAlign>,
    // group
    pub expanded: Option<bool>,
    // frame
    pub clip_content: Option<bool>,
    // line / arrow
    pub points: Option<Vec<f64>>,
    pub arrow_start: Option<bool>,
    pub arrow_end: Option<bool>,
    // vector
    pub vector_points: Option<Vec<VectorPoint>>,
    pub closed: Option<bool>,
    // path
    pub data: Option<String>,
}

impl LayerPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn geometry(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_fill(mut self, fill: SerializableColor) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into `layer`. Sizes are clamped to be non-negative and opacity to
    /// `[0, 1]`.
    pub fn apply(&self, layer: &mut Layer) {
        if let Some(x) = self.x {
            layer.x = x;
        }
        if let Some(y) = self.y {
            layer.y = y;
        }
        if let Some(width) = self.width {
            layer.width = width.max(0.0);
        }
        if let Some(height) = self.height {
            layer.height = height.max(0.0);
        }
        if let Some(rotation) = self.rotation {
            layer.rotation = rotation;
        }
        if let Some(fill) = self.fill {
            layer.fill = fill;
        }
        if let Some(stroke) = self.stroke {
            layer.stroke = Some(stroke);
        }
        if let Some(stroke_width) = self.stroke_width {
            layer.stroke_width = Some(stroke_width.max(0.0));
        }
        if let Some(visible) = self.visible {
            layer.visible = visible;
        }
        if let Some(locked) = self.locked {
            layer.locked = locked;
        }
        if let Some(name) = &self.name {
            layer.name = Some(name.clone());
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = Some(opacity.clamp(0.0, 1.0));
        }
        if let Some(blur) = self.blur {
            layer.blur = Some(blur.max(0.0));
        }
        if let Some(shadow) = self.shadow {
            layer.shadow = Some(shadow);
        }

        match &mut layer.kind {
            LayerKind::Rectangle(rect) => {
                if let Some(radius) = self.corner_radius {
                    rect.corner_radius = radius.max(0.0);
                }
            }
            LayerKind::Text(text) => {
                if let Some(content) = &self.text {
                    text.text = content.clone();
                }
                if let Some(family) = &self.font_family {
                    text.font_family = family.clone();
                }
                if let Some(size) = self.font_size {
                    text.font_size = size.max(0.0);
                }
                if let Some(weight) = self.font_weight {
                    text.font_weight = weight;
                }
                if let Some(align) = self.text_align {
                    text.text_align = align;
                }
            }
            LayerKind::Group(group) => {
                if let Some(expanded) = self.expanded {
                    group.expanded = expanded;
                }
            }
            LayerKind::Frame(frame) => {
                if let Some(clip) = self.clip_content {
                    frame.clip_content = clip;
                }
            }
            LayerKind::Line(line) | LayerKind::Arrow(line) => {
                if let Some(points) = &self.points {
                    line.points = points.clone();
                }
                if let Some(start) = self.arrow_start {
                    line.arrow_start = start;
                }
                if let Some(end) = self.arrow_end {
                    line.arrow_end = end;
                }
            }
            LayerKind::Vector(vector) => {
                if let Some(points) = &self.vector_points {
                    vector.points = points.clone();
                }
                if let Some(closed) = self.closed {
                    vector.closed = closed;
                }
            }
            LayerKind::Path(path) => {
                if let Some(data) = &self.data {
                    path.data = data.clone();
                }
            }
            LayerKind::Ellipse => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shallow_merge_keeps_other_fields() {
        let mut layer = Layer::rectangle(0.0, 0.0, 10.0, 10.0).with_name("Box");
        LayerPatch::position(5.0, 6.0).apply(&mut layer);
        assert!((layer.x - 5.0).abs() < f64::EPSILON);
        assert!((layer.y - 6.0).abs() < f64::EPSILON);
        assert!((layer.width - 10.0).abs() < f64::EPSILON);
        assert_eq!(layer.name.as_deref(), Some("Box"));
    }

    #[test]
    fn test_negative_size_clamped() {
        let mut layer = Layer::rectangle(0.0, 0.0, 10.0, 10.0);
        LayerPatch::geometry(0.0, 0.0, -5.0, 3.0).apply(&mut layer);
        assert!(layer.width.abs() < f64::EPSILON);
        assert!((layer.height - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_variant_fields_ignored_on_mismatch() {
        let mut layer = Layer::ellipse(0.0, 0.0, 10.0, 10.0);
        let before = layer.clone();
        LayerPatch::new().with_text("nope").apply(&mut layer);
        assert_eq!(layer, before);

        let mut text = Layer::text(0.0, 0.0, "old");
        LayerPatch::new().with_text("new").apply(&mut text);
        match &text.kind {
            LayerKind::Text(props) => assert_eq!(props.text, "new"),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_patch_from_json() {
        let patch: LayerPatch = serde_json::from_str(r##"{"fill":"#112233","fontSize":24}"##).unwrap();
        assert_eq!(patch.fill, Some(SerializableColor::rgb(0x11, 0x22, 0x33)));
        assert_eq!(patch.font_size, Some(24.0));
        assert!(!patch.is_empty());
        assert!(LayerPatch::new().is_empty());
    }
}
