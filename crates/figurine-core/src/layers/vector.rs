//! Vector (pen-tool) layer properties.

use crate::geometry::points_bounds;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// How the path behaves at a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerType {
    #[default]
    Corner,
    Smooth,
    Symmetric,
}

/// A vertex of a vector path, in the layer's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, rename = "type")]
    pub corner: CornerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_in: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_out: Option<Point>,
}

impl VectorPoint {
    pub fn corner(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            corner: CornerType::Corner,
            handle_in: None,
            handle_out: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Fields carried only by vector layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorProps {
    #[serde(default)]
    pub points: Vec<VectorPoint>,
    #[serde(default)]
    pub closed: bool,
}

impl VectorProps {
    /// Build corner points from world positions, re-expressed relative to
    /// their bounding box origin. Returns the box alongside the props.
    pub fn from_world_points(points: &[Point], closed: bool) -> Option<(Rect, Self)> {
        let bounds = points_bounds(points)?;
        let points = points
            .iter()
            .map(|p| VectorPoint::corner(p.x - bounds.x0, p.y - bounds.y0))
            .collect();
        Some((bounds, Self { points, closed }))
    }

    /// Stretch the vertices and their handles about the local origin.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        let stretch = |p: Point| Point::new(p.x * sx, p.y * sy);
        for point in &mut self.points {
            point.x *= sx;
            point.y *= sy;
            point.handle_in = point.handle_in.map(stretch);
            point.handle_out = point.handle_out.map(stretch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_relative_to_bbox_origin() {
        let world = [
            Point::new(100.0, 50.0),
            Point::new(140.0, 20.0),
            Point::new(120.0, 90.0),
        ];
        let (bounds, props) = VectorProps::from_world_points(&world, false).unwrap();
        assert_eq!(bounds, Rect::new(100.0, 20.0, 140.0, 90.0));
        assert_eq!(props.points[0].position(), Point::new(0.0, 30.0));
        assert_eq!(props.points[1].position(), Point::new(40.0, 0.0));
        assert!(props.points.iter().all(|p| p.corner == CornerType::Corner));
    }

    #[test]
    fn test_scale_moves_handles() {
        let mut props = VectorProps {
            points: vec![
                VectorPoint::corner(0.0, 0.0),
                VectorPoint {
                    handle_in: Some(Point::new(80.0, 40.0)),
                    handle_out: Some(Point::new(120.0, 60.0)),
                    ..VectorPoint::corner(100.0, 50.0)
                },
            ],
            closed: false,
        };
        props.scale(0.5, 2.0);
        assert_eq!(props.points[1].position(), Point::new(50.0, 100.0));
        assert_eq!(props.points[1].handle_in, Some(Point::new(40.0, 80.0)));
        assert_eq!(props.points[1].handle_out, Some(Point::new(60.0, 120.0)));
        assert_eq!(props.points[0].position(), Point::ZERO);
    }

    #[test]
    fn test_empty_points_yield_none() {
        assert!(VectorProps::from_world_points(&[], true).is_none());
    }
}
