//! Oval shape.

use super::{Rgba, ShapeId};
use kurbo::{BezPath, Ellipse as KurboEllipse, Point, Rect as KurboRect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse stored as the two opposite corners of its bounding box.
///
/// Same raw-corner convention as [`super::Rect`]: normalization happens
/// at every consumer, never at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Oval {
    pub(crate) id: ShapeId,
    /// First corner of the bounding box (drag start).
    pub a: Point,
    /// Opposite corner (drag end).
    pub b: Point,
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width.
    pub stroke_width: f64,
}

impl Oval {
    /// Create a new oval from two opposite bounding-box corners.
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

    /// Get as a kurbo Ellipse.
    pub fn as_kurbo(&self) -> KurboEllipse {
        let rect = self.as_rect();
        KurboEllipse::new(rect.center(), (rect.width() / 2.0, rect.height() / 2.0), 0.0)
    }

    pub fn bounds(&self) -> KurboRect {
        self.as_rect()
    }

    /// Point-in-ellipse containment.
    pub fn hit_test(&self, point: Point) -> bool {
        let rect = self.as_rect();
        let rx = rect.width() / 2.0;
        let ry = rect.height() / 2.0;
        if rx < f64::EPSILON || ry < f64::EPSILON {
            return false;
        }
        let center = rect.center();
        let dx = (point.x - center.x) / rx;
        let dy = (point.y - center.y) / ry;
        dx * dx + dy * dy <= 1.0
    }

    pub fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.a += delta;
        self.b += delta;
    }
}
