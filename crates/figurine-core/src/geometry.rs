//! Bounding boxes and hit testing over layers.

use crate::ids::LayerId;
use crate::layers::{Layer, root_layers};
use kurbo::{Point, Rect};

/// Union of the axis-aligned boxes of `layers`; `None` when empty.
pub fn union_bounds<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Option<Rect> {
    layers
        .into_iter()
        .map(Layer::bounds)
        .reduce(|acc, b| acc.union(b))
}

/// Smallest box containing `points`; `None` when empty.
pub fn points_bounds(points: &[Point]) -> Option<Rect> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold(Rect::from_points(first, first), |acc, &p| acc.union_pt(p)),
    )
}

/// Resolves which layer sits under a world-space point.
pub trait HitTester {
    /// Topmost hittable layer at `point`, given the full layer list.
    fn hit_test(&self, layers: &[Layer], point: Point) -> Option<LayerId>;
}

/// Hit tester using each root layer's rotated box.
///
/// Hidden and locked layers are transparent to clicks. Later layers in the
/// list are on top.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsHitTester {
    /// Extra slop around each layer, in world units.
    pub tolerance: f64,
}

impl BoundsHitTester {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl HitTester for BoundsHitTester {
    fn hit_test(&self, layers: &[Layer], point: Point) -> Option<LayerId> {
        root_layers(layers)
            .into_iter()
            .rev()
            .filter(|l| l.visible && !l.locked)
            .find(|l| l.contains_point(point, self.tolerance))
            .map(|l| l.id.clone())
    }
}
