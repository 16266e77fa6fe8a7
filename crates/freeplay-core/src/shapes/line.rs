//! Line shape.

use super::{LINE_HIT_SLOP_MIN, LINE_HIT_SLOP_PAD, Rgba, ShapeId, point_to_segment_dist};
use kurbo::{BezPath, Line as KurboLine, Point, Rect as KurboRect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A straight line segment between two world points.
///
/// Pen strokes are sequences of these, committed segment by segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub a: Point,
    /// End point.
    pub b: Point,
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width.
    pub stroke_width: f64,
}

impl Line {
    /// Create a new line.
    pub fn new(a: Point, b: Point, color: Rgba, stroke_width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            a,
            b,
            color,
            stroke_width,
        }
    }

    /// Get the length of the line.
    pub fn length(&self) -> f64 {
        let dx = self.b.x - self.a.x;
        let dy = self.b.y - self.a.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Get as a kurbo Line.
    pub fn as_kurbo(&self) -> KurboLine {
        KurboLine::new(self.a, self.b)
    }

    pub fn bounds(&self) -> KurboRect {
        KurboRect::from_points(self.a, self.b)
    }

    /// Hit slop in world units: a fixed floor keeps thin lines
    /// selectable, thick strokes grow the slop with their width.
    pub fn hit_tolerance(&self) -> f64 {
        LINE_HIT_SLOP_MIN.max(self.stroke_width + LINE_HIT_SLOP_PAD)
    }

    pub fn hit_test(&self, point: Point) -> bool {
        point_to_segment_dist(point, self.a, self.b) <= self.hit_tolerance()
    }

    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.a);
        path.line_to(self.b);
        path
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.a += delta;
        self.b += delta;
    }
}
