//! Loaded source raster.

use std::fmt;
use std::sync::Arc;

use image::RgbaImage;

/// An immutable, cheaply clonable handle to a decoded source image.
///
/// Editing never touches these pixels; the compositor only reads them.
#[derive(Clone)]
pub struct SourceImage {
    pixels: Arc<RgbaImage>,
}

impl SourceImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether two handles refer to the same decoded image.
    pub fn same_image(&self, other: &SourceImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

impl From<RgbaImage> for SourceImage {
    fn from(pixels: RgbaImage) -> Self {
        Self::new(pixels)
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PartialEq for SourceImage {
    fn eq(&self, other: &Self) -> bool {
        self.same_image(other)
    }
}
