//! Line and arrow layer properties.

use crate::geometry::points_bounds;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Fields carried by line and arrow layers.
///
/// `points` is a flat `[x1, y1, x2, y2, ...]` list in the layer's local space;
/// the layer position is the origin of that space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProps {
    #[serde(default)]
    pub points: Vec<f64>,
    #[serde(default)]
    pub arrow_start: bool,
    #[serde(default)]
    pub arrow_end: bool,
}

impl LineProps {
    /// A straight segment from the local origin to `(dx, dy)`.
    pub fn segment(dx: f64, dy: f64) -> Self {
        Self {
            points: vec![0.0, 0.0, dx, dy],
            arrow_start: false,
            arrow_end: false,
        }
    }

    /// Same as [`LineProps::segment`] with an arrow head at the end.
    pub fn arrow(dx: f64, dy: f64) -> Self {
        Self {
            arrow_end: true,
            ..Self::segment(dx, dy)
        }
    }

    /// Local-space points. A trailing odd coordinate is ignored.
    pub fn local_points(&self) -> Vec<Point> {
        self.points
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect()
    }

    /// Replace the end of the first segment, keeping the start at the origin.
    pub fn set_end(&mut self, dx: f64, dy: f64) {
        if self.points.len() < 4 {
            self.points = vec![0.0, 0.0, dx, dy];
        } else {
            let n = self.points.len();
            self.points[n - 2] = dx;
            self.points[n - 1] = dy;
        }
    }

    /// Bounding box of the local points, `None` when there are none.
    pub fn local_bounds(&self) -> Option<Rect> {
        points_bounds(&self.local_points())
    }

    /// Stretch the points about the local origin.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        for pair in self.points.chunks_exact_mut(2) {
            pair[0] *= sx;
            pair[1] *= sy;
        }
    }
}
