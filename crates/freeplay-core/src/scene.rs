//! Scene document: the ordered shape list plus view and style state.

use crate::camera::Camera;
use crate::shapes::{FontSpec, Rgba, Shape, ShapeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current persisted format version.
const FORMAT_VERSION: u32 = 1;

fn format_version() -> u32 {
    FORMAT_VERSION
}

/// Failure to persist or restore a scene snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("malformed scene snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Default style values applied to newly committed shapes.
///
/// Toolbars and pickers mutate these through the session setters; shapes
/// snapshot them at commit time, so later changes never restyle existing
/// shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleDefaults {
    /// Stroke color for pen/line/rect/oval commits.
    pub pen_color: Rgba,
    /// Fill color for text commits.
    pub text_color: Rgba,
    /// Stroke width for pen/line/rect/oval commits.
    pub pen_width: f64,
    /// Font for text commits.
    pub font: FontSpec,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            pen_color: Rgba::black(),
            text_color: Rgba::black(),
            pen_width: 4.0,
            font: FontSpec::default(),
        }
    }
}

/// The complete drawable state: shape list plus view and style defaults.
///
/// Insertion order is z-order: later shapes draw on top and win hit
/// tests. This is also exactly what persists; the serialized form is a
/// self-describing JSON snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default = "format_version")]
    pub version: u32,
    /// All shapes, back to front.
    pub shapes: Vec<Shape>,
    /// View transform, persisted with the scene.
    pub camera: Camera,
    /// Style defaults, persisted with the scene.
    pub defaults: StyleDefaults,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self {
            version: FORMAT_VERSION,
            shapes: Vec::new(),
            camera: Camera::new(),
            defaults: StyleDefaults::default(),
        }
    }

    /// Add a shape on top of the z-order.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.shapes.push(shape);
        id
    }

    /// Remove a shape by id.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|shape| shape.id() == id)?;
        Some(self.shapes.remove(index))
    }

    /// Remove all shapes. View and style defaults are untouched.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    /// Get a shape by id.
    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|shape| shape.id() == id)
    }

    /// Get a mutable reference to a shape by id.
    pub fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|shape| shape.id() == id)
    }

    /// Check if the scene has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Get the bounding box of all shapes.
    pub fn bounds(&self) -> Option<Rect> {
        let mut result: Option<Rect> = None;
        for shape in &self.shapes {
            let bounds = shape.bounds();
            result = Some(match result {
                Some(r) => r.union(bounds),
                None => bounds,
            });
        }
        result
    }

    /// Find the topmost shape at a point (in world coordinates).
    ///
    /// Shapes are tested front to back; the first containment wins.
    pub fn shape_at(&self, point: Point) -> Option<ShapeId> {
        self.shapes
            .iter()
            .rev()
            .find(|shape| shape.hit_test(point))
            .map(|shape| shape.id())
    }

    /// Serialize the scene to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to the persisted byte form.
    pub fn save(&self) -> Result<Vec<u8>, PersistenceError> {
        Ok(self.to_json()?.into_bytes())
    }

    /// Restore a scene from persisted bytes.
    ///
    /// Corrupt or foreign bytes fail with a distinct error; callers keep
    /// their current scene untouched in that case.
    pub fn load(bytes: &[u8]) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Image, Line, Oval, Rect as RectShape, Text};
    use kurbo::Vec2;

    fn tiny_png() -> Vec<u8> {
        let bitmap = image::RgbaImage::from_pixel(3, 3, image::Rgba([0, 128, 255, 255]));
        let mut bytes = Vec::new();
        bitmap
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_shape(Shape::Line(Line::new(
            Point::new(0.0, 0.0),
            Point::new(40.0, 30.0),
            Rgba::new(255, 0, 0, 255),
            3.0,
        )));
        scene.add_shape(Shape::Rect(RectShape::new(
            Point::new(10.0, 10.0),
            Point::new(50.0, 40.0),
            Rgba::black(),
            2.0,
        )));
        scene.add_shape(Shape::Oval(Oval::new(
            Point::new(60.0, 60.0),
            Point::new(20.0, 90.0),
            Rgba::new(0, 0, 255, 255),
            5.0,
        )));
        scene.add_shape(Shape::Text(Text::new(
            Point::new(5.0, 5.0),
            "hi\nthere".to_string(),
            Rgba::black(),
            FontSpec::default(),
        )));
        scene.add_shape(Shape::Image(
            Image::from_bytes(Point::new(100.0, 100.0), &tiny_png()).unwrap(),
        ));
        scene.camera.offset = Vec2::new(12.0, -8.0);
        scene.camera.zoom = 2.5;
        scene.defaults.pen_width = 7.0;
        scene
    }

    #[test]
    fn test_scene_creation() {
        let scene = Scene::new();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_add_remove_shape() {
        let mut scene = Scene::new();
        let id = scene.add_shape(Shape::Rect(RectShape::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            Rgba::black(),
            2.0,
        )));
        assert_eq!(scene.len(), 1);
        assert!(scene.get_shape(id).is_some());

        let removed = scene.remove_shape(id);
        assert!(removed.is_some());
        assert!(scene.is_empty());
    }

    #[test]
    fn test_topmost_wins() {
        let mut scene = Scene::new();
        let bottom = scene.add_shape(Shape::Rect(RectShape::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            Rgba::black(),
            2.0,
        )));
        let top = scene.add_shape(Shape::Rect(RectShape::new(
            Point::new(0.0, 0.0),
            Point::new(100.0, 100.0),
            Rgba::black(),
            2.0,
        )));

        // Both contain the point; the later-inserted shape wins.
        assert_eq!(scene.shape_at(Point::new(50.0, 50.0)), Some(top));

        scene.remove_shape(top);
        assert_eq!(scene.shape_at(Point::new(50.0, 50.0)), Some(bottom));
    }

    #[test]
    fn test_shape_at_misses_empty_space() {
        let scene = sample_scene();
        assert_eq!(scene.shape_at(Point::new(-500.0, -500.0)), None);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let scene = sample_scene();
        let bytes = scene.save().unwrap();
        let restored = Scene::load(&bytes).unwrap();

        assert_eq!(restored.len(), scene.len());
        assert!((restored.camera.zoom - 2.5).abs() < f64::EPSILON);
        assert_eq!(restored.camera.offset, Vec2::new(12.0, -8.0));
        assert!((restored.defaults.pen_width - 7.0).abs() < f64::EPSILON);

        for (original, loaded) in scene.shapes.iter().zip(restored.shapes.iter()) {
            assert_eq!(original.id(), loaded.id());
            match (original, loaded) {
                (Shape::Line(a), Shape::Line(b)) => {
                    assert_eq!(a.a, b.a);
                    assert_eq!(a.b, b.b);
                    assert_eq!(a.color, b.color);
                }
                (Shape::Rect(a), Shape::Rect(b)) => {
                    assert_eq!(a.a, b.a);
                    assert_eq!(a.b, b.b);
                }
                (Shape::Oval(a), Shape::Oval(b)) => {
                    assert_eq!(a.a, b.a);
                    assert_eq!(a.b, b.b);
                }
                (Shape::Text(a), Shape::Text(b)) => {
                    assert_eq!(a.content, b.content);
                    assert_eq!(a.origin, b.origin);
                    assert_eq!(a.font, b.font);
                }
                (Shape::Image(a), Shape::Image(b)) => {
                    assert_eq!(a.data_base64, b.data_base64);
                    assert_eq!(a.position, b.position);
                    // The decoded cache never travels
                    assert!(!b.is_decoded());
                }
                (a, b) => panic!("variant mismatch: {a:?} vs {b:?}"),
            }
        }
    }

    #[test]
    fn test_degenerate_rect_roundtrip() {
        let mut scene = Scene::new();
        let p = Point::new(10.0, 10.0);
        scene.add_shape(Shape::Rect(RectShape::new(p, p, Rgba::black(), 2.0)));

        let restored = Scene::load(&scene.save().unwrap()).unwrap();
        assert_eq!(restored.len(), 1);
        match &restored.shapes[0] {
            Shape::Rect(rect) => {
                assert_eq!(rect.a, p);
                assert_eq!(rect.b, p);
            }
            other => panic!("expected rect, got {other:?}"),
        }
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(
            Scene::load(b"definitely not a scene"),
            Err(PersistenceError::Malformed(_))
        ));
    }

    #[test]
    fn test_clear_keeps_view_and_style() {
        let mut scene = sample_scene();
        scene.clear();
        assert!(scene.is_empty());
        assert!((scene.camera.zoom - 2.5).abs() < f64::EPSILON);
        assert!((scene.defaults.pen_width - 7.0).abs() < f64::EPSILON);
    }
}
