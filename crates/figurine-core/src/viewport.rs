//! Viewport state: zoom and pan of the canvas.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;

/// Step applied by wheel and zoom-tool clicks.
pub const ZOOM_STEP: f64 = 1.1;

/// Zoom and pixel offset of the canvas.
///
/// Maps world to screen as `screen = zoom * world + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasState {
    pub zoom: f64,
    pub offset: Vec2,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
        }
    }
}

impl CanvasState {
    /// Unzoomed, unpanned viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clamp a zoom factor to the supported range; NaN becomes 1.
    pub fn clamp_zoom(zoom: f64) -> f64 {
        if zoom.is_nan() {
            return 1.0;
        }
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = Self::clamp_zoom(zoom);
    }

    /// World to screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen to world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a delta in screen pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom by `factor`, keeping the world point under `screen_point` fixed.
    ///
    /// Returns `false` when the clamped zoom did not change.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        let new_zoom = Self::clamp_zoom(self.zoom * factor);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        let new_screen = self.world_to_screen(world_point);
        self.offset += screen_point - new_screen;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let canvas = CanvasState::new();
        let p = Point::new(100.0, 200.0);
        assert_eq!(canvas.screen_to_world(p), p);
        assert_eq!(canvas.zoom_percent(), 100);
    }

    #[test]
    fn test_screen_to_world_with_zoom_and_offset() {
        let canvas = CanvasState {
            zoom: 2.0,
            offset: Vec2::new(50.0, 100.0),
        };
        let world = canvas.screen_to_world(Point::new(150.0, 300.0));
        assert!((world.x - 50.0).abs() < 1e-10);
        assert!((world.y - 100.0).abs() < 1e-10);

        let back = canvas.world_to_screen(world);
        assert!((back.x - 150.0).abs() < 1e-10);
        assert!((back.y - 300.0).abs() < 1e-10);
    }

    #[test]
    fn test_zoom_to_cursor_keeps_point_fixed() {
        let mut canvas = CanvasState::new();
        let cursor = Point::new(100.0, 100.0);
        let world_before = canvas.screen_to_world(cursor);

        assert!(canvas.zoom_at(cursor, ZOOM_STEP));
        assert!((canvas.zoom - 1.1).abs() < 1e-10);

        let screen_after = canvas.world_to_screen(world_before);
        assert!((screen_after.x - 100.0).abs() < 1e-9);
        assert!((screen_after.y - 100.0).abs() < 1e-9);
        assert!((canvas.offset.x + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamp() {
        let mut canvas = CanvasState::new();
        canvas.zoom_at(Point::ZERO, 0.001);
        assert!((canvas.zoom - MIN_ZOOM).abs() < f64::EPSILON);
        assert!(!canvas.zoom_at(Point::ZERO, 0.5));

        canvas.set_zoom(1000.0);
        assert!((canvas.zoom - MAX_ZOOM).abs() < f64::EPSILON);
        assert_eq!(CanvasState::clamp_zoom(f64::NAN), 1.0);
        assert_eq!(CanvasState::clamp_zoom(2.5), 2.5);
    }

    #[test]
    fn test_pan() {
        let mut canvas = CanvasState::new();
        canvas.pan(Vec2::new(10.0, 20.0));
        canvas.pan(Vec2::new(-5.0, 0.0));
        assert_eq!(canvas.offset, Vec2::new(5.0, 20.0));
    }
}
