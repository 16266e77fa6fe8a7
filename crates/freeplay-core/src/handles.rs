//! Resize handles for image shapes.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Side length of a corner handle's hit box, in world units.
pub const HANDLE_SIZE: f64 = 8.0;
/// Minimum width/height a resize can shrink an image to.
pub const MIN_IMAGE_SIZE: f64 = 16.0;

/// Corner positions of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All four corners.
    pub fn all() -> [Corner; 4] {
        [
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomLeft,
            Corner::BottomRight,
        ]
    }

    /// The diagonally opposite corner (the fixed anchor during a resize).
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomLeft => Corner::TopRight,
            Corner::BottomRight => Corner::TopLeft,
        }
    }

    /// This corner's position on a bounding box.
    pub fn position(self, bounds: Rect) -> Point {
        match self {
            Corner::TopLeft => Point::new(bounds.x0, bounds.y0),
            Corner::TopRight => Point::new(bounds.x1, bounds.y0),
            Corner::BottomLeft => Point::new(bounds.x0, bounds.y1),
            Corner::BottomRight => Point::new(bounds.x1, bounds.y1),
        }
    }
}

/// The hit box of a handle centered on a corner position.
pub fn handle_rect(corner: Point) -> Rect {
    let half = HANDLE_SIZE / 2.0;
    Rect::new(
        corner.x - half,
        corner.y - half,
        corner.x + half,
        corner.y + half,
    )
}

/// Find which corner handle of `bounds` (if any) contains `point`.
pub fn hit_test_handles(bounds: Rect, point: Point) -> Option<Corner> {
    Corner::all()
        .into_iter()
        .find(|corner| handle_rect(corner.position(bounds)).contains(point))
}

/// Recompute an image bounding box from the fixed anchor corner and the
/// dragged pointer, enforcing the minimum size so a resize can never
/// collapse the image to zero or negative area.
pub fn resize_from_anchor(anchor: Point, pointer: Point) -> Rect {
    let width = (pointer.x - anchor.x).abs().max(MIN_IMAGE_SIZE);
    let height = (pointer.y - anchor.y).abs().max(MIN_IMAGE_SIZE);
    let x0 = if pointer.x >= anchor.x {
        anchor.x
    } else {
        anchor.x - width
    };
    let y0 = if pointer.y >= anchor.y {
        anchor.y
    } else {
        anchor.y - height
    };
    Rect::new(x0, y0, x0 + width, y0 + height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_corners() {
        assert_eq!(Corner::TopLeft.opposite(), Corner::BottomRight);
        assert_eq!(Corner::BottomLeft.opposite(), Corner::TopRight);
    }

    #[test]
    fn test_handle_hit() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        // Dead center of the bottom-right handle
        assert_eq!(
            hit_test_handles(bounds, Point::new(100.0, 50.0)),
            Some(Corner::BottomRight)
        );
        // Just inside the 8x8 box
        assert_eq!(
            hit_test_handles(bounds, Point::new(3.0, 3.0)),
            Some(Corner::TopLeft)
        );
        // Middle of the shape hits no handle
        assert_eq!(hit_test_handles(bounds, Point::new(50.0, 25.0)), None);
    }

    #[test]
    fn test_resize_from_anchor() {
        let anchor = Point::new(0.0, 0.0);
        let rect = resize_from_anchor(anchor, Point::new(80.0, 40.0));
        assert_eq!(rect, Rect::new(0.0, 0.0, 80.0, 40.0));

        // Dragging past the anchor flips the box to the other side
        let rect = resize_from_anchor(anchor, Point::new(-60.0, -30.0));
        assert_eq!(rect, Rect::new(-60.0, -30.0, 0.0, 0.0));
    }

    #[test]
    fn test_resize_clamps_to_minimum() {
        let anchor = Point::new(100.0, 100.0);
        let rect = resize_from_anchor(anchor, Point::new(102.0, 101.0));
        assert!((rect.width() - MIN_IMAGE_SIZE).abs() < f64::EPSILON);
        assert!((rect.height() - MIN_IMAGE_SIZE).abs() < f64::EPSILON);
        // The anchor corner stays fixed
        assert!((rect.x0 - 100.0).abs() < f64::EPSILON);
        assert!((rect.y0 - 100.0).abs() < f64::EPSILON);
    }
}
