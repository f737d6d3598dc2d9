//! PNG export of the composited surface.

use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};

use shotframe_common::error::{ShotframeError, ShotframeResult};

use crate::surface::{surface_byte_len, DrawingSurface};

/// Requested output size.
///
/// Missing dimensions follow the surface: with only one given, the other
/// keeps the surface aspect ratio. `pixel_ratio` multiplies both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub pixel_ratio: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            pixel_ratio: 1.0,
        }
    }
}

impl ExportOptions {
    /// Final pixel size for a surface of `surface_w` x `surface_h`.
    pub fn target_size(&self, surface_w: u32, surface_h: u32) -> ShotframeResult<(u32, u32)> {
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(ShotframeError::geometry(format!(
                "pixel ratio {} must be positive",
                self.pixel_ratio
            )));
        }
        if surface_w == 0 || surface_h == 0 {
            return Err(ShotframeError::geometry(format!(
                "cannot export a {surface_w}x{surface_h} surface"
            )));
        }

        let aspect = surface_w as f64 / surface_h as f64;
        let (w, h) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w as f64, h as f64),
            (Some(w), None) => (w as f64, w as f64 / aspect),
            (None, Some(h)) => (h as f64 * aspect, h as f64),
            (None, None) => (surface_w as f64, surface_h as f64),
        };

        let ratio = self.pixel_ratio as f64;
        let (w, h) = ((w * ratio).round(), (h * ratio).round());
        if !(w >= 1.0 && h >= 1.0 && w <= u32::MAX as f64 && h <= u32::MAX as f64) {
            return Err(ShotframeError::geometry(format!(
                "export size {w}x{h} is out of range"
            )));
        }
        let (w, h) = (w as u32, h as u32);
        surface_byte_len(w, h)?;
        Ok((w, h))
    }
}

/// Encode the surface as PNG at the requested size.
pub fn encode_png(surface: &DrawingSurface, options: &ExportOptions) -> ShotframeResult<Vec<u8>> {
    let (width, height) = options.target_size(surface.width(), surface.height())?;
    let mut image = surface.to_rgba_image();
    if (width, height) != image.dimensions() {
        // The resampler's f32 intermediate pairs one source and one target side.
        surface_byte_len(image.width(), height)?;
        surface_byte_len(width, image.height())?;
        tracing::debug!(
            from_width = image.width(),
            from_height = image.height(),
            width,
            height,
            "Resampling for export"
        );
        image = imageops::resize(&image, width, height, FilterType::Lanczos3);
    }
    encode_image_png(&image)
}

/// Encode a straight-alpha RGBA image as PNG.
pub fn encode_image_png(image: &RgbaImage) -> ShotframeResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| ShotframeError::export(format!("PNG encoding failed: {e}")))?;
    Ok(bytes)
}

/// Default export file name, e.g. `shotframe-20240102-153000.png`.
pub fn default_file_name() -> String {
    format!(
        "shotframe-{}.png",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

/// Write encoded bytes to `dir/<file_name>` (or a timestamped default name),
/// creating `dir` as needed.
pub fn write_export(bytes: &[u8], dir: &Path, file_name: Option<&str>) -> ShotframeResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name.map(str::to_string).unwrap_or_else(default_file_name));
    std::fs::write(&path, bytes)?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Exported image");
    Ok(path)
}
