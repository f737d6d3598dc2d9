//! Raster effects with canvas semantics: drop shadow, Gaussian blur, and
//! the CSS filter functions.

use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, PixmapRef, Transform};

use shotframe_common::error::ShotframeResult;
use shotframe_editor_model::{Filter, BLUR_FILTER_RADIUS_PX};

use crate::surface::{allocate_pixmap, demultiply_in_place, premultiply_in_place};

/// Alpha of the fixed black shadow color.
pub const SHADOW_ALPHA: f32 = 0.5;

/// Cast a drop shadow of `source` (drawn with `placement`) onto `target`.
///
/// Matches a canvas `shadowBlur = shadow`, `shadowOffsetX/Y = shadow / 2`,
/// `shadowColor = rgba(0,0,0,0.5)` configuration: the blur's standard
/// deviation is half the blur value.
pub fn draw_drop_shadow(
    target: &mut Pixmap,
    source: PixmapRef<'_>,
    placement: Transform,
    quality: FilterQuality,
    shadow: u32,
) -> ShotframeResult<()> {
    let mut silhouette = allocate_pixmap(target.width(), target.height())?;

    let paint = PixmapPaint {
        quality,
        ..PixmapPaint::default()
    };
    silhouette.draw_pixmap(0, 0, source, &paint, placement, None);

    for pixel in silhouette.data_mut().chunks_exact_mut(4) {
        let alpha = (pixel[3] as f32 * SHADOW_ALPHA).round() as u8;
        pixel[0] = 0;
        pixel[1] = 0;
        pixel[2] = 0;
        pixel[3] = alpha;
    }

    let (width, height) = (silhouette.width() as usize, silhouette.height() as usize);
    gaussian_blur(silhouette.data_mut(), width, height, shadow as f32 / 2.0);

    let offset = shadow as f32 / 2.0;
    target.draw_pixmap(
        0,
        0,
        silhouette.as_ref(),
        &PixmapPaint::default(),
        Transform::from_translate(offset, offset),
        None,
    );
    Ok(())
}

/// Apply a post filter to the whole pixmap, replacing its content.
pub fn apply_filter(pixmap: &mut Pixmap, filter: Filter) {
    let (width, height) = (pixmap.width() as usize, pixmap.height() as usize);
    match filter {
        Filter::None => {}
        Filter::Blur => gaussian_blur(
            pixmap.data_mut(),
            width,
            height,
            BLUR_FILTER_RADIUS_PX as f32,
        ),
        Filter::Grayscale => map_rgb(pixmap.data_mut(), |[r, g, b]| {
            let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
            [luma, luma, luma]
        }),
        Filter::Sepia => map_rgb(pixmap.data_mut(), |[r, g, b]| {
            [
                0.393 * r + 0.769 * g + 0.189 * b,
                0.349 * r + 0.686 * g + 0.168 * b,
                0.272 * r + 0.534 * g + 0.131 * b,
            ]
        }),
        Filter::Invert => map_rgb(pixmap.data_mut(), |[r, g, b]| {
            [255.0 - r, 255.0 - g, 255.0 - b]
        }),
        Filter::Brightness { percent } => {
            let k = percent as f32 / 100.0;
            map_rgb(pixmap.data_mut(), |[r, g, b]| [r * k, g * k, b * k])
        }
        Filter::Contrast { percent } => {
            let k = percent as f32 / 100.0;
            let intercept = 255.0 * (0.5 - 0.5 * k);
            map_rgb(pixmap.data_mut(), |[r, g, b]| {
                [r * k + intercept, g * k + intercept, b * k + intercept]
            })
        }
    }
}

/// Apply a color transform to straight RGB values in `[0, 255]`.
/// Fully transparent pixels are left alone.
fn map_rgb(premultiplied: &mut [u8], f: impl Fn([f32; 3]) -> [f32; 3]) {
    demultiply_in_place(premultiplied);
    for pixel in premultiplied.chunks_exact_mut(4) {
        if pixel[3] == 0 {
            continue;
        }
        let out = f([pixel[0] as f32, pixel[1] as f32, pixel[2] as f32]);
        for (channel, value) in pixel.iter_mut().zip(out) {
            *channel = value.round().clamp(0.0, 255.0) as u8;
        }
    }
    premultiply_in_place(premultiplied);
}

/// Gaussian blur of premultiplied RGBA8 data, approximated by three box
/// passes per axis. Pixels outside the buffer count as transparent.
///
/// `sigma` is capped at the larger buffer dimension; beyond that every
/// pass already spans the whole buffer.
pub fn gaussian_blur(data: &mut [u8], width: usize, height: usize, sigma: f32) {
    if sigma.is_nan() || sigma <= 0.0 || width == 0 || height == 0 || data.len() != width * height * 4 {
        return;
    }
    let sigma = sigma.min(width.max(height) as f32);
    let mut scratch = vec![0u8; data.len()];
    for size in box_sizes_for_gauss(sigma, 3) {
        let radius = (size - 1) / 2;
        if radius == 0 {
            continue;
        }
        box_blur_horizontal(data, &mut scratch, width, height, radius);
        box_blur_vertical(&scratch, data, width, height, radius);
    }
}

/// Box widths whose successive application approximates a Gaussian with
/// standard deviation `sigma`.
fn box_sizes_for_gauss(sigma: f32, passes: usize) -> Vec<usize> {
    let n = passes as f32;
    let ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut lower = ideal.floor() as i64;
    if lower % 2 == 0 {
        lower -= 1;
    }
    let lower = lower.max(1);
    let upper = lower + 2;
    let lf = lower as f32;
    let m_ideal = (12.0 * sigma * sigma - n * lf * lf - 4.0 * n * lf - 3.0 * n) / (-4.0 * lf - 4.0);
    let m = m_ideal.round().max(0.0) as usize;

    (0..passes)
        .map(|i| if i < m { lower as usize } else { upper as usize })
        .collect()
}

fn box_blur_horizontal(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize) {
    let window = (2 * radius + 1) as u32;
    for y in 0..height {
        let row = y * width * 4;
        let mut acc = [0u32; 4];
        for x in 0..=radius.min(width - 1) {
            for c in 0..4 {
                acc[c] += src[row + x * 4 + c] as u32;
            }
        }
        for x in 0..width {
            for c in 0..4 {
                dst[row + x * 4 + c] = ((acc[c] + window / 2) / window) as u8;
            }
            let incoming = x + radius + 1;
            if incoming < width {
                for c in 0..4 {
                    acc[c] += src[row + incoming * 4 + c] as u32;
                }
            }
            if x >= radius {
                let outgoing = x - radius;
                for c in 0..4 {
                    acc[c] -= src[row + outgoing * 4 + c] as u32;
                }
            }
        }
    }
}

fn box_blur_vertical(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize) {
    let window = (2 * radius + 1) as u32;
    let stride = width * 4;
    for x in 0..width {
        let column = x * 4;
        let mut acc = [0u32; 4];
        for y in 0..=radius.min(height - 1) {
            for c in 0..4 {
                acc[c] += src[y * stride + column + c] as u32;
            }
        }
        for y in 0..height {
            for c in 0..4 {
                dst[y * stride + column + c] = ((acc[c] + window / 2) / window) as u8;
            }
            let incoming = y + radius + 1;
            if incoming < height {
                for c in 0..4 {
                    acc[c] += src[incoming * stride + column + c] as u32;
                }
            }
            if y >= radius {
                let outgoing = y - radius;
                for c in 0..4 {
                    acc[c] -= src[outgoing * stride + column + c] as u32;
                }
            }
        }
    }
}
