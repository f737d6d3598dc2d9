//! The raster drawing surface and conversions to and from `image` buffers.
//!
//! Pixels live premultiplied inside a [`tiny_skia::Pixmap`]; conversions
//! to [`RgbaImage`] demultiply.

use image::RgbaImage;
use tiny_skia::{Color, IntSize, Pixmap};

use shotframe_common::error::{ShotframeError, ShotframeResult};
use shotframe_editor_model::Rgba;

/// Raster target the compositor paints onto.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSurface {
    pixmap: Pixmap,
}

impl DrawingSurface {
    /// Allocate a cleared surface, failing on zero or unallocatable sizes.
    pub fn new(width: u32, height: u32) -> ShotframeResult<Self> {
        Ok(Self {
            pixmap: allocate_pixmap(width, height)?,
        })
    }

    pub(crate) fn from_pixmap(pixmap: Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Swap in a fully rendered pixmap.
    pub(crate) fn replace(&mut self, pixmap: Pixmap) {
        self.pixmap = pixmap;
    }

    /// Straight-alpha color at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Copy out as a straight-alpha RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut data = self.pixmap.data().to_vec();
        demultiply_in_place(&mut data);
        // Length always matches width * height * 4.
        RgbaImage::from_raw(self.width(), self.height(), data)
            .unwrap_or_else(|| RgbaImage::new(self.width(), self.height()))
    }
}

/// Largest RGBA8 buffer the engine will allocate (16384 x 16384 pixels).
pub const MAX_SURFACE_BYTES: usize = 1 << 30;

/// Byte length of a `width` x `height` RGBA8 buffer, rejecting zero sizes
/// and anything above [`MAX_SURFACE_BYTES`].
pub fn surface_byte_len(width: u32, height: u32) -> ShotframeResult<usize> {
    if width == 0 || height == 0 {
        return Err(ShotframeError::geometry(format!(
            "surface size {width}x{height} must be positive"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(4))
        .filter(|&len| len <= MAX_SURFACE_BYTES)
        .ok_or_else(|| {
            ShotframeError::geometry(format!(
                "surface size {width}x{height} exceeds the {MAX_SURFACE_BYTES}-byte limit"
            ))
        })
}

/// Allocate a transparent pixmap after validating the size.
pub fn allocate_pixmap(width: u32, height: u32) -> ShotframeResult<Pixmap> {
    let len = surface_byte_len(width, height)?;
    let size = IntSize::from_wh(width, height).ok_or_else(|| {
        ShotframeError::geometry(format!("surface size {width}x{height} is invalid"))
    })?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| {
        ShotframeError::geometry(format!("surface size {width}x{height} cannot be allocated"))
    })?;
    data.resize(len, 0);

    Pixmap::from_vec(data, size).ok_or_else(|| {
        ShotframeError::geometry(format!("surface size {width}x{height} cannot be allocated"))
    })
}

/// Premultiplied pixmap copy of a straight-alpha image.
pub fn pixmap_from_image(image: &RgbaImage) -> ShotframeResult<Pixmap> {
    let (width, height) = image.dimensions();
    let size = IntSize::from_wh(width, height).ok_or_else(|| {
        ShotframeError::geometry(format!("source size {width}x{height} must be positive"))
    })?;
    let mut data = image.as_raw().clone();
    premultiply_in_place(&mut data);
    Pixmap::from_vec(data, size)
        .ok_or_else(|| ShotframeError::render("source pixels do not match their dimensions"))
}

pub fn to_skia_color(color: Rgba) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

pub(crate) fn premultiply_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3] as u16;
        pixel[0] = ((pixel[0] as u16 * alpha + 127) / 255) as u8;
        pixel[1] = ((pixel[1] as u16 * alpha + 127) / 255) as u8;
        pixel[2] = ((pixel[2] as u16 * alpha + 127) / 255) as u8;
    }
}

pub(crate) fn demultiply_in_place(bytes: &mut [u8]) {
    for pixel in bytes.chunks_exact_mut(4) {
        let alpha = pixel[3];
        if alpha == 0 {
            pixel[0] = 0;
            pixel[1] = 0;
            pixel[2] = 0;
            continue;
        }

        let alpha_u16 = alpha as u16;
        pixel[0] = ((pixel[0] as u16 * 255 + (alpha_u16 / 2)) / alpha_u16).min(255) as u8;
        pixel[1] = ((pixel[1] as u16 * 255 + (alpha_u16 / 2)) / alpha_u16).min(255) as u8;
        pixel[2] = ((pixel[2] as u16 * 255 + (alpha_u16 / 2)) / alpha_u16).min(255) as u8;
    }
}
