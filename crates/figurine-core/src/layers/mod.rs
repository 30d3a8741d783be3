//! Layer definitions for the editor document.

mod color;
mod frame;
mod group;
mod line;
mod patch;
mod text;
mod vector;

pub use color::{ColorParseError, SerializableColor};
pub use frame::{FramePreset, FrameProps};
pub use group::GroupProps;
pub use line::LineProps;
pub use patch::LayerPatch;
pub use text::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_TEXT, FontWeight, TextAlign, TextProps};
pub use vector::{CornerType, VectorPoint, VectorProps};

use crate::ids::LayerId;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Type tag of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Rectangle,
    Ellipse,
    Text,
    Group,
    Frame,
    Line,
    Arrow,
    Vector,
    Path,
}

impl LayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Rectangle => "rectangle",
            LayerType::Ellipse => "ellipse",
            LayerType::Text => "text",
            LayerType::Group => "group",
            LayerType::Frame => "frame",
            LayerType::Line => "line",
            LayerType::Arrow => "arrow",
            LayerType::Vector => "vector",
            LayerType::Path => "path",
        }
    }

    /// Name shown in the layer list for unnamed layers.
    pub fn display_name(&self) -> &'static str {
        match self {
            LayerType::Rectangle => "Rectangle",
            LayerType::Ellipse => "Ellipse",
            LayerType::Text => "Text",
            LayerType::Group => "Group",
            LayerType::Frame => "Frame",
            LayerType::Line => "Line",
            LayerType::Arrow => "Arrow",
            LayerType::Vector => "Vector",
            LayerType::Path => "Path",
        }
    }
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields carried only by rectangles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleProps {
    #[serde(default)]
    pub corner_radius: f64,
}

/// Fields carried only by raw path layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathProps {
    /// SVG path data (`M 0 0 L 10 10 ...`).
    #[serde(default)]
    pub data: String,
}

/// Variant-specific data, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    Rectangle(RectangleProps),
    Ellipse,
    Text(TextProps),
    Group(GroupProps),
    Frame(FrameProps),
    Line(LineProps),
    Arrow(LineProps),
    Vector(VectorProps),
    Path(PathProps),
}

impl LayerKind {
    pub fn layer_type(&self) -> LayerType {
        match self {
            LayerKind::Rectangle(_) => LayerType::Rectangle,
            LayerKind::Ellipse => LayerType::Ellipse,
            LayerKind::Text(_) => LayerType::Text,
            LayerKind::Group(_) => LayerType::Group,
            LayerKind::Frame(_) => LayerType::Frame,
            LayerKind::Line(_) => LayerType::Line,
            LayerKind::Arrow(_) => LayerType::Arrow,
            LayerKind::Vector(_) => LayerType::Vector,
            LayerKind::Path(_) => LayerType::Path,
        }
    }
}

/// Drop shadow settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    pub color: SerializableColor,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: SerializableColor::new(0, 0, 0, 64),
            offset_x: 0.0,
            offset_y: 4.0,
            blur: 4.0,
        }
    }
}

fn default_visible() -> bool {
    true
}

/// A drawable object on the canvas.
///
/// Common geometry and style live on the struct; everything that only makes
/// sense for one type lives in [`LayerKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: LayerId,
    /// Top-left of the layer box. For lines and arrows, the origin of the
    /// local point space.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, around the layer origin.
    #[serde(default)]
    pub rotation: f64,
    pub fill: SerializableColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<SerializableColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blur: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    /// Create a layer with a freshly generated id.
    pub fn new(kind: LayerKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        let fill = match &kind {
            LayerKind::Frame(_) => SerializableColor::white(),
            LayerKind::Text(_) => SerializableColor::black(),
            LayerKind::Line(_) | LayerKind::Arrow(_) | LayerKind::Vector(_) | LayerKind::Group(_) => {
                SerializableColor::transparent()
            }
            _ => SerializableColor::default_fill(),
        };
        let (stroke, stroke_width) = match &kind {
            LayerKind::Line(_) | LayerKind::Arrow(_) | LayerKind::Vector(_) | LayerKind::Path(_) => {
                (Some(SerializableColor::black()), Some(2.0))
            }
            _ => (None, None),
        };
        Self {
            id: LayerId::generate(kind.layer_type().as_str()),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            fill,
            stroke,
            stroke_width,
            visible: true,
            locked: false,
            name: None,
            opacity: None,
            blur: None,
            shadow: None,
            kind,
        }
    }

    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(LayerKind::Rectangle(RectangleProps::default()), x, y, width, height)
    }

    pub fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(LayerKind::Ellipse, x, y, width, height)
    }

    pub fn frame(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(LayerKind::Frame(FrameProps::default()), x, y, width, height)
    }

    /// Text layer sized by a rough estimate of its content.
    pub fn text(x: f64, y: f64, content: impl Into<String>) -> Self {
        let props = TextProps::new(content);
        let (width, height) = props.estimated_size();
        Self::new(LayerKind::Text(props), x, y, width, height)
    }

    pub fn line(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self::new(LayerKind::Line(LineProps::segment(dx, dy)), x, y, dx.abs(), dy.abs())
    }

    pub fn arrow(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self::new(LayerKind::Arrow(LineProps::arrow(dx, dy)), x, y, dx.abs(), dy.abs())
    }

    /// Vector layer from world points; `None` for an empty point list.
    pub fn vector(points: &[Point], closed: bool) -> Option<Self> {
        let (bounds, props) = VectorProps::from_world_points(points, closed)?;
        Some(Self::new(
            LayerKind::Vector(props),
            bounds.x0,
            bounds.y0,
            bounds.width(),
            bounds.height(),
        ))
    }

    pub fn path(x: f64, y: f64, width: f64, height: f64, data: impl Into<String>) -> Self {
        Self::new(LayerKind::Path(PathProps { data: data.into() }), x, y, width, height)
    }

    /// Group layer over `children`, taking `bounds` as its own geometry.
    pub fn group(children: Vec<LayerId>, bounds: Rect) -> Self {
        Self::new(
            LayerKind::Group(GroupProps::new(children)),
            bounds.x0,
            bounds.y0,
            bounds.width(),
            bounds.height(),
        )
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_fill(mut self, fill: SerializableColor) -> Self {
        self.fill = fill;
        self
    }

    pub fn layer_type(&self) -> LayerType {
        self.kind.layer_type()
    }

    /// Name for display, falling back to the type name.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.layer_type().display_name().to_string())
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Axis-aligned box in the coordinate space the layer is stored in.
    ///
    /// Rotation is ignored. Lines and arrows use their actual points so a
    /// segment drawn up or to the left still gets the right box.
    pub fn bounds(&self) -> Rect {
        match &self.kind {
            LayerKind::Line(line) | LayerKind::Arrow(line) => line
                .local_bounds()
                .map(|b| b + Vec2::new(self.x, self.y))
                .unwrap_or_else(|| Rect::from_origin_size(self.position(), (0.0, 0.0))),
            _ => Rect::new(self.x, self.y, self.x + self.width, self.y + self.height),
        }
    }

    /// Transform from the layer's local space to its parent space.
    pub fn local_transform(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y)) * Affine::rotate(self.rotation.to_radians())
    }

    /// Hit test against the (rotated) layer box, with `point` in parent space.
    pub fn contains_point(&self, point: Point, tolerance: f64) -> bool {
        let local = self.local_transform().inverse() * point;
        let bounds = self.bounds() - Vec2::new(self.x, self.y);
        match &self.kind {
            LayerKind::Ellipse => {
                let rx = self.width / 2.0 + tolerance;
                let ry = self.height / 2.0 + tolerance;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = local.x - self.width / 2.0;
                let dy = local.y - self.height / 2.0;
                (dx * dx) / (rx * rx) + (dy * dy) / (ry * ry) <= 1.0
            }
            _ => bounds.inflate(tolerance, tolerance).contains(local),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, LayerKind::Group(_))
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.kind, LayerKind::Frame(_))
    }

    pub fn as_group(&self) -> Option<&GroupProps> {
        match &self.kind {
            LayerKind::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_group_mut(&mut self) -> Option<&mut GroupProps> {
        match &mut self.kind {
            LayerKind::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Child ids for groups, empty for everything else.
    pub fn children(&self) -> &[LayerId] {
        self.as_group().map(|g| g.children.as_slice()).unwrap_or(&[])
    }
}

/// Ids listed as a child of any group in `layers`.
pub fn child_ids(layers: &[Layer]) -> HashSet<&LayerId> {
    layers.iter().flat_map(|l| l.children().iter()).collect()
}

/// Layers that render at the top level: everything not owned by a group,
/// in list (z) order.
pub fn root_layers(layers: &[Layer]) -> Vec<&Layer> {
    let children = child_ids(layers);
    layers.iter().filter(|l| !children.contains(&l.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_defaults() {
        let rect = Layer::rectangle(10.0, 20.0, 100.0, 50.0);
        assert_eq!(rect.layer_type(), LayerType::Rectangle);
        assert!(rect.id.as_str().starts_with("rectangle-"));
        assert!(rect.visible);
        assert!(!rect.locked);
        assert!((rect.rotation).abs() < f64::EPSILON);
        assert_eq!(rect.bounds(), Rect::new(10.0, 20.0, 110.0, 70.0));
    }

    #[test]
    fn test_line_bounds_follow_points() {
        let line = Layer::line(100.0, 100.0, -40.0, 30.0);
        assert_eq!(line.bounds(), Rect::new(60.0, 100.0, 100.0, 130.0));
        assert!((line.width - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rotated_hit_test() {
        let mut rect = Layer::rectangle(0.0, 0.0, 100.0, 10.0);
        assert!(rect.contains_point(Point::new(50.0, 5.0), 0.0));
        rect.rotation = 90.0;
        // Rotated around the origin, the bar now points down along +y.
        assert!(rect.contains_point(Point::new(-5.0, 50.0), 0.0));
        assert!(!rect.contains_point(Point::new(50.0, 5.0), 0.0));
    }

    #[test]
    fn test_ellipse_hit_test_excludes_corners() {
        let ellipse = Layer::ellipse(0.0, 0.0, 100.0, 100.0);
        assert!(ellipse.contains_point(Point::new(50.0, 50.0), 0.0));
        assert!(!ellipse.contains_point(Point::new(2.0, 2.0), 0.0));
    }

    #[test]
    fn test_json_shape_is_tagged_and_camel_case() {
        let layer = Layer::text(5.0, 6.0, "Hello").with_name("Title");
        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(value["type"], "text");
        assert_eq!(value["text"], "Hello");
        assert_eq!(value["fontFamily"], DEFAULT_FONT_FAMILY);
        assert_eq!(value["name"], "Title");
        assert!(value.get("stroke").is_none());

        let back: Layer = serde_json::from_value(value).unwrap();
        assert_eq!(back, layer);
    }

    #[test]
    fn test_minimal_json_gets_defaults() {
        let json = r##"{"id":"ellipse-1","type":"ellipse","x":1,"y":2,"width":3,"height":4,"fill":"#ff0000"}"##;
        let layer: Layer = serde_json::from_str(json).unwrap();
        assert_eq!(layer.kind, LayerKind::Ellipse);
        assert!(layer.visible);
        assert_eq!(layer.fill, SerializableColor::rgb(255, 0, 0));
    }

    #[test]
    fn test_root_layers_skip_group_children() {
        let a = Layer::rectangle(0.0, 0.0, 10.0, 10.0);
        let b = Layer::ellipse(0.0, 0.0, 10.0, 10.0);
        let c = Layer::rectangle(50.0, 50.0, 10.0, 10.0);
        let group = Layer::group(vec![a.id.clone(), b.id.clone()], Rect::new(0.0, 0.0, 10.0, 10.0));
        let layers = vec![a, b, c.clone(), group.clone()];
        let roots: Vec<_> = root_layers(&layers).into_iter().map(|l| l.id.clone()).collect();
        assert_eq!(roots, vec![c.id, group.id]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r##"{"id":"x","type":"star","x":0,"y":0,"width":1,"height":1,"fill":"#000"}"##;
        assert!(serde_json::from_str::<Layer>(json).is_err());
    }
}
