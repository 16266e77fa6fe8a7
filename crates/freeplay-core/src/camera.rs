//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom factor applied per wheel notch when zooming in.
pub const ZOOM_STEP_IN: f64 = 1.1;
/// Zoom factor applied per wheel notch when zooming out.
pub const ZOOM_STEP_OUT: f64 = 0.9;

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and world coordinates. Shape
/// geometry lives in world coordinates; pointer events arrive in screen
/// coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen pixels.
    pub offset: Vec2,
    /// Current zoom level (1.0 = 100%).
    pub zoom: f64,
    /// Minimum allowed zoom level.
    pub min_zoom: f64,
    /// Maximum allowed zoom level.
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts world coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to world coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to world coordinates.
    ///
    /// The zoom clamp keeps the transform invertible in normal operation,
    /// but a corrupted camera (zero or non-finite zoom) must not take the
    /// event loop down with it: the point is returned untransformed
    /// instead.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        if !self.zoom.is_finite() || self.zoom.abs() < f64::EPSILON {
            return screen_point;
        }
        self.inverse_transform() * screen_point
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan the camera by a delta in screen coordinates.
    ///
    /// Panning is screen-space: the delta is added to the offset as-is,
    /// independent of the zoom level.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    ///
    /// The world point under the cursor before the zoom stays under the
    /// cursor after it, so zooming is always cursor-centered.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        // Convert screen point to world before zoom
        let world_point = self.screen_to_world(screen_point);

        // Apply new zoom
        self.zoom = new_zoom;

        // Adjust offset so world_point stays at screen_point
        let new_screen = self.world_to_screen(world_point);
        let correction = Vec2::new(
            screen_point.x - new_screen.x,
            screen_point.y - new_screen.y,
        );
        self.offset += correction;
    }

    /// Reset camera to default position and zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::new();
        assert_eq!(camera.offset, Vec2::ZERO);
        assert!((camera.zoom - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_identity() {
        let camera = Camera::new();
        let screen = Point::new(100.0, 200.0);
        let world = camera.screen_to_world(screen);
        assert!((world.x - screen.x).abs() < f64::EPSILON);
        assert!((world.y - screen.y).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_offset() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(50.0, 100.0);
        let screen = Point::new(100.0, 200.0);
        let world = camera.screen_to_world(screen);
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_screen_to_world_with_zoom() {
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        let screen = Point::new(100.0, 200.0);
        let world = camera.screen_to_world(screen);
        assert!((world.x - 50.0).abs() < f64::EPSILON);
        assert!((world.y - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_roundtrip_conversion() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(30.0, -20.0);
        camera.zoom = 1.5;

        let original = Point::new(123.0, 456.0);
        let world = camera.screen_to_world(original);
        let back = camera.world_to_screen(world);

        assert!((back.x - original.x).abs() < 1e-10);
        assert!((back.y - original.y).abs() < 1e-10);
    }

    #[test]
    fn test_roundtrip_across_zoom_range() {
        for zoom in [0.1, 0.5, 1.0, 3.7, 10.0] {
            let mut camera = Camera::new();
            camera.offset = Vec2::new(-75.0, 40.0);
            camera.zoom = zoom;

            let original = Point::new(12.5, -98.0);
            let back = camera.world_to_screen(camera.screen_to_world(original));
            assert!((back.x - original.x).abs() < 1e-9, "zoom {zoom}");
            assert!((back.y - original.y).abs() < 1e-9, "zoom {zoom}");
        }
    }

    #[test]
    fn test_zoom_clamp() {
        let mut camera = Camera::new();
        camera.zoom_at(Point::ZERO, 0.001); // Try to zoom way out
        assert!((camera.zoom - camera.min_zoom).abs() < f64::EPSILON);

        camera.zoom = 1.0;
        camera.zoom_at(Point::ZERO, 1000.0); // Try to zoom way in
        assert!((camera.zoom - camera.max_zoom).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zoom_anchors_cursor() {
        let mut camera = Camera::new();
        let cursor = Point::new(100.0, 100.0);

        let before = camera.screen_to_world(cursor);
        camera.zoom_at(cursor, ZOOM_STEP_IN);
        camera.zoom_at(cursor, ZOOM_STEP_IN);
        let after = camera.screen_to_world(cursor);

        // Two wheel notches in: 1.1 * 1.1
        assert!((camera.zoom - 1.21).abs() < 1e-12);
        assert!((after.x - before.x).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_anchors_cursor_outward() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(13.0, -7.0);
        camera.zoom = 2.0;
        let cursor = Point::new(320.0, 200.0);

        let before = camera.screen_to_world(cursor);
        camera.zoom_at(cursor, ZOOM_STEP_OUT);
        let after = camera.screen_to_world(cursor);

        assert!((after.x - before.x).abs() < 1e-9);
        assert!((after.y - before.y).abs() < 1e-9);
    }

    #[test]
    fn test_singular_zoom_falls_back_to_input() {
        let mut camera = Camera::new();
        camera.zoom = 0.0;
        let screen = Point::new(42.0, 17.0);
        let world = camera.screen_to_world(screen);
        assert_eq!(world, screen);
    }

    #[test]
    fn test_pan() {
        let mut camera = Camera::new();
        camera.pan(Vec2::new(10.0, 20.0));
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
        assert!((camera.offset.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pan_is_screen_space() {
        let mut camera = Camera::new();
        camera.zoom = 4.0;
        camera.pan(Vec2::new(10.0, 0.0));
        // The offset takes the raw delta, not delta * zoom.
        assert!((camera.offset.x - 10.0).abs() < f64::EPSILON);
    }
}
