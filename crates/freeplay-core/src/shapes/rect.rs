//! Rectangle shape.

use super::{Rgba, ShapeId};
use kurbo::{BezPath, Point, Rect as KurboRect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle stored as two opposite corners.
///
/// The corners are kept raw, in whatever order the drag produced them;
/// every consumer normalizes to a min/max bounding box, so drags in any
/// direction and zero-size "dot" rectangles all work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rect {
    pub(crate) id: ShapeId,
    /// First corner (drag start).
    pub a: Point,
    /// Opposite corner (drag end).
    pub b: Point,
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width.
    pub stroke_width: f64,
}

impl Rect {
    /// Create a new rectangle from two opposite corners.
    pub fn new(a: Point, b: Point, color: Rgba, stroke_width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            a,
            b,
            color,
            stroke_width,
        }
    }

    /// Get the normalized bounding box.
    pub fn as_rect(&self) -> KurboRect {
        KurboRect::from_points(self.a, self.b)
    }

    pub fn bounds(&self) -> KurboRect {
        self.as_rect()
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.as_rect().contains(point)
    }

    pub fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.a += delta;
        self.b += delta;
    }
}
