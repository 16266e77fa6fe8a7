//! Text shape and font metrics.

use super::{Rgba, ShapeId};
use kurbo::{BezPath, Point, Rect as KurboRect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum bounding-box width so short or empty text stays clickable.
pub(crate) const MIN_TEXT_WIDTH: f64 = 20.0;

/// Font family options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    /// Clean sans-serif font (default).
    #[default]
    SansSerif,
    /// Serif font.
    Serif,
    /// Fixed-width font.
    Monospace,
}

impl FontFamily {
    /// Get the font family name as used by the renderer.
    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::SansSerif => "sans-serif",
            FontFamily::Serif => "serif",
            FontFamily::Monospace => "monospace",
        }
    }

    /// Get all available font families.
    pub fn all() -> &'static [FontFamily] {
        &[
            FontFamily::SansSerif,
            FontFamily::Serif,
            FontFamily::Monospace,
        ]
    }
}

/// Font style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(&self) -> bool {
        matches!(self, FontStyle::Bold | FontStyle::BoldItalic)
    }

    pub fn is_italic(&self) -> bool {
        matches!(self, FontStyle::Italic | FontStyle::BoldItalic)
    }
}

/// A font selection with the metrics the engine derives from it.
///
/// The engine loads no font files; metrics are approximations good
/// enough for hit boxes and caret placement. The renderer owns the
/// pixel-accurate layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: FontFamily,
    /// Font size in world units.
    pub size: f64,
    pub style: FontStyle,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: FontFamily::default(),
            size: Self::DEFAULT_SIZE,
            style: FontStyle::default(),
        }
    }
}

impl FontSpec {
    /// Default font size.
    pub const DEFAULT_SIZE: f64 = 24.0;

    /// Baseline-to-top distance.
    pub fn ascent(&self) -> f64 {
        self.size * 0.8
    }

    /// Vertical advance between successive baselines.
    pub fn line_height(&self) -> f64 {
        self.size * 1.2
    }

    /// Horizontal advance of one character.
    ///
    /// Average character width varies by family and weight; these
    /// factors are empirically determined approximations.
    pub fn char_advance(&self) -> f64 {
        let factor = match (self.family, self.style.is_bold()) {
            (FontFamily::SansSerif, false) => 0.52,
            (FontFamily::SansSerif, true) => 0.56,
            (FontFamily::Serif, false) => 0.50,
            (FontFamily::Serif, true) => 0.54,
            (FontFamily::Monospace, _) => 0.60,
        };
        self.size * factor
    }

    /// Width of a single line of text.
    pub fn line_width(&self, line: &str) -> f64 {
        line.chars().count() as f64 * self.char_advance()
    }

    /// Measure a multi-line block: (width of the widest line, total height).
    pub fn measure(&self, content: &str) -> (f64, f64) {
        let width = content
            .lines()
            .map(|line| self.line_width(line))
            .fold(0.0, f64::max);

        // Count lines (empty content = 1 line); lines() does not count a
        // trailing empty line, so a trailing newline adds one.
        let mut line_count = content.lines().count().max(1);
        if content.ends_with('\n') {
            line_count += 1;
        }
        (width, line_count as f64 * self.line_height())
    }
}

/// A multi-line text shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// The text content, possibly spanning multiple lines.
    pub content: String,
    /// Baseline of the first line, in world coordinates.
    pub origin: Point,
    /// Fill color.
    pub color: Rgba,
    /// Font selection.
    pub font: FontSpec,
}

impl Text {
    /// Create a new text shape.
    pub fn new(origin: Point, content: String, color: Rgba, font: FontSpec) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            origin,
            color,
            font,
        }
    }

    /// Bounding box from the current font metrics.
    ///
    /// Recomputed on every call; a font change retroactively affects
    /// future measurements but never mutates the stored shape.
    pub fn bounds(&self) -> KurboRect {
        let (width, height) = self.font.measure(&self.content);
        let top = self.origin.y - self.font.ascent();
        KurboRect::new(
            self.origin.x,
            top,
            self.origin.x + width.max(MIN_TEXT_WIDTH),
            top + height,
        )
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.bounds().contains(point)
    }

    /// Text has no simple outline; the bounding box stands in for
    /// selection rendering.
    pub fn to_path(&self) -> BezPath {
        let bounds = self.bounds();
        let mut path = BezPath::new();
        path.move_to(Point::new(bounds.x0, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y0));
        path.line_to(Point::new(bounds.x1, bounds.y1));
        path.line_to(Point::new(bounds.x0, bounds.y1));
        path.close_path();
        path
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.origin += delta;
    }
}
