//! Image shape for dropped raster images.

use super::ShapeId;
use base64::{Engine, engine::general_purpose::STANDARD};
use kurbo::{BezPath, Point, Rect as KurboRect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use uuid::Uuid;

/// Error decoding an image's durable byte payload.
#[derive(Debug, Error)]
pub enum ImageDecodeError {
    #[error("image payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("image payload could not be decoded: {0}")]
    Decode(#[from] image::ImageError),
}

/// An image shape displaying a raster image.
///
/// Only the encoded bytes are durable. The decoded bitmap is a derived
/// cache: absent after deserialization, rebuilt from `data_base64` on
/// first access, never persisted and never part of equality.
#[derive(Debug, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    /// Top-left corner position.
    pub position: Point,
    /// Display width.
    pub width: f64,
    /// Display height.
    pub height: f64,
    /// Encoded image bytes (PNG, JPEG or WebP) as base64.
    pub data_base64: String,
    /// Lazily decoded RGBA bitmap.
    #[serde(skip)]
    decoded: RwLock<Option<Arc<image::RgbaImage>>>,
}

impl Clone for Image {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            position: self.position,
            width: self.width,
            height: self.height,
            data_base64: self.data_base64.clone(),
            // Clone the cached bitmap, not the lock
            decoded: RwLock::new(self.decoded.read().ok().and_then(|guard| (*guard).clone())),
        }
    }
}

impl Image {
    /// Create an image shape from encoded bytes.
    ///
    /// Decodes once up front to pick up the source dimensions (which
    /// become the initial display size) and to reject corrupt payloads
    /// at drop time rather than at first draw.
    pub fn from_bytes(position: Point, data: &[u8]) -> Result<Self, ImageDecodeError> {
        let bitmap = image::load_from_memory(data)?.to_rgba8();
        let (width, height) = bitmap.dimensions();
        Ok(Self {
            id: Uuid::new_v4(),
            position,
            width: width as f64,
            height: height as f64,
            data_base64: STANDARD.encode(data),
            decoded: RwLock::new(Some(Arc::new(bitmap))),
        })
    }

    /// The decoded bitmap, rebuilding it from the durable bytes on first
    /// access after a load.
    ///
    /// Renderers that get an error here draw [`Image::as_rect`] as a
    /// bordered placeholder instead of the pixels.
    pub fn bitmap(&self) -> Result<Arc<image::RgbaImage>, ImageDecodeError> {
        if let Ok(cache) = self.decoded.read() {
            if let Some(bitmap) = cache.as_ref() {
                return Ok(bitmap.clone());
            }
        }
        let data = STANDARD.decode(&self.data_base64)?;
        let bitmap = Arc::new(image::load_from_memory(&data)?.to_rgba8());
        if let Ok(mut cache) = self.decoded.write() {
            *cache = Some(bitmap.clone());
        }
        Ok(bitmap)
    }

    /// Whether the decode cache is currently populated.
    pub fn is_decoded(&self) -> bool {
        self.decoded
            .read()
            .map(|cache| cache.is_some())
            .unwrap_or(false)
    }

    /// Get the display rectangle.
    pub fn as_rect(&self) -> KurboRect {
        KurboRect::new(
            self.position.x,
            self.position.y,
            self.position.x + self.width,
            self.position.y + self.height,
        )
    }

    /// Replace the display rectangle (used by corner resizes).
    pub fn set_rect(&mut self, rect: KurboRect) {
        self.position = Point::new(rect.x0, rect.y0);
        self.width = rect.width();
        self.height = rect.height();
    }

    pub fn bounds(&self) -> KurboRect {
        self.as_rect()
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.as_rect().contains(point)
    }

    /// The display rectangle as a path (selection rendering and the
    /// decode-failure placeholder).
    pub fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }
}
