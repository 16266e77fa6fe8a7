//! Shape definitions for the canvas.

mod image;
mod line;
mod oval;
mod rect;
mod text;

pub use image::{Image, ImageDecodeError};
pub use line::Line;
pub use oval::Oval;
pub use rect::Rect;
pub use text::{FontFamily, FontSpec, FontStyle, Text};
pub(crate) use text::MIN_TEXT_WIDTH;

use kurbo::{BezPath, Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Unique identifier for shapes.
///
/// Selection tracks a shape by id; two shapes are never "the same" by
/// value, only by identity.
pub type ShapeId = Uuid;

/// Base hit slop for thin strokes, in world units.
pub(crate) const LINE_HIT_SLOP_MIN: f64 = 8.0;
/// Extra slop added on top of a stroke's width.
pub(crate) const LINE_HIT_SLOP_PAD: f64 = 6.0;

/// Distance from a point to a line segment (a->b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = Vec2::new(b.x - a.x, b.y - a.y);
    let pv = Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Enum wrapper for all shape types.
///
/// Insertion order into the scene is z-order; the enum keeps the
/// hit-tester and the serializer exhaustive over the closed variant set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Line(Line),
    Rect(Rect),
    Oval(Oval),
    Text(Text),
    Image(Image),
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Line(s) => s.id,
            Shape::Rect(s) => s.id,
            Shape::Oval(s) => s.id,
            Shape::Text(s) => s.id,
            Shape::Image(s) => s.id,
        }
    }

    /// Get the bounding box in world coordinates.
    pub fn bounds(&self) -> kurbo::Rect {
        match self {
            Shape::Line(s) => s.bounds(),
            Shape::Rect(s) => s.bounds(),
            Shape::Oval(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
            Shape::Image(s) => s.bounds(),
        }
    }

    /// Check if a point (in world coordinates) hits this shape.
    ///
    /// Tolerances are in world units and do not scale with the camera
    /// zoom, so they visually shrink as the user zooms in.
    pub fn hit_test(&self, point: Point) -> bool {
        match self {
            Shape::Line(s) => s.hit_test(point),
            Shape::Rect(s) => s.hit_test(point),
            Shape::Oval(s) => s.hit_test(point),
            Shape::Text(s) => s.hit_test(point),
            Shape::Image(s) => s.hit_test(point),
        }
    }

    /// Get the path representation for rendering.
    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Line(s) => s.to_path(),
            Shape::Rect(s) => s.to_path(),
            Shape::Oval(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
            Shape::Image(s) => s.to_path(),
        }
    }

    /// Move the shape's stored geometry by a world-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Line(s) => s.translate(delta),
            Shape::Rect(s) => s.translate(delta),
            Shape::Oval(s) => s.translate(delta),
            Shape::Text(s) => s.translate(delta),
            Shape::Image(s) => s.translate(delta),
        }
    }

    /// The point drags are measured against: the first stored corner for
    /// line/rect/oval, the baseline origin for text, the top-left corner
    /// for images.
    pub fn anchor(&self) -> Point {
        match self {
            Shape::Line(s) => s.a,
            Shape::Rect(s) => s.a,
            Shape::Oval(s) => s.a,
            Shape::Text(s) => s.origin,
            Shape::Image(s) => s.position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(100.0, 0.0);
        assert!((point_to_segment_dist(Point::new(50.0, 10.0), a, b) - 10.0).abs() < 1e-12);
        // Beyond the endpoint the distance is to the endpoint itself
        assert!((point_to_segment_dist(Point::new(110.0, 0.0), a, b) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_distance_degenerate() {
        let p = Point::new(5.0, 5.0);
        let d = point_to_segment_dist(Point::new(8.0, 9.0), p, p);
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_color_roundtrip() {
        let rgba = Rgba::new(12, 34, 56, 200);
        let color: Color = rgba.into();
        let back: Rgba = color.into();
        assert_eq!(rgba, back);
    }

    #[test]
    fn test_translate_moves_anchor() {
        let mut shape = Shape::Rect(Rect::new(
            Point::new(10.0, 10.0),
            Point::new(50.0, 40.0),
            Rgba::black(),
            2.0,
        ));
        shape.translate(Vec2::new(5.0, -5.0));
        assert_eq!(shape.anchor(), Point::new(15.0, 5.0));
    }
}
