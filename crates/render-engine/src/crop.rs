//! Crop a selection made on a displayed (possibly scaled) image.

use image::{imageops, RgbaImage};

use shotframe_editor_model::{Rect, Size};

/// Map `selection`, given in on-screen coordinates of an image displayed
/// at `displayed` size, to source pixels and extract that region.
///
/// Each axis is scaled independently by `source / displayed`. The region
/// is clipped to the image. Degenerate selections or display bounds yield
/// `None` (logged, never a panic and never a 0x0 image).
pub fn compute_crop(source: &RgbaImage, displayed: Size, selection: Rect) -> Option<RgbaImage> {
    if selection.is_degenerate() {
        tracing::warn!(
            width = selection.width,
            height = selection.height,
            "Ignoring empty crop selection"
        );
        return None;
    }
    if displayed.is_degenerate() {
        tracing::warn!(
            width = displayed.width,
            height = displayed.height,
            "Ignoring crop against empty display bounds"
        );
        return None;
    }

    let (src_w, src_h) = source.dimensions();
    let scale_x = src_w as f64 / displayed.width;
    let scale_y = src_h as f64 / displayed.height;
    let bounds = Rect::new(0.0, 0.0, src_w as f64, src_h as f64);

    let Some(region) = selection.scale(scale_x, scale_y).intersect(&bounds) else {
        tracing::warn!(?selection, "Crop selection lies outside the image");
        return None;
    };

    let left = region.x.round() as u32;
    let top = region.y.round() as u32;
    let right = (region.right().round() as u32).min(src_w);
    let bottom = (region.bottom().round() as u32).min(src_h);
    if right <= left || bottom <= top {
        tracing::warn!(?region, "Crop selection rounds to an empty region");
        return None;
    }

    tracing::debug!(left, top, width = right - left, height = bottom - top, "Cropping");
    Some(imageops::crop_imm(source, left, top, right - left, bottom - top).to_image())
}
