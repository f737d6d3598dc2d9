//! Frame compositor: combines the source image, editor styling, and
//! annotations into the output surface.
//!
//! The recipe is fixed and always replayed from scratch:
//! size + clear, background, rotation, shadow, image, inset, corner mask,
//! un-rotate, filter, annotations. Each step is skipped at its neutral
//! value.

use tiny_skia::{
    FillRule, FilterQuality, GradientStop, LinearGradient, Mask, Paint, Path, PathBuilder, Pixmap,
    PixmapPaint, Point as SkPoint, Rect, SpreadMode, Transform,
};

use shotframe_common::error::{ShotframeError, ShotframeResult};
use shotframe_editor_model::{normalize_degrees, Background, EditorState, Fill, Rgba, SourceImage};

use crate::effects::{apply_filter, draw_drop_shadow};
use crate::strokes::draw_strokes;
use crate::surface::{
    allocate_pixmap, pixmap_from_image, surface_byte_len, to_skia_color, DrawingSurface,
};

/// Color of the inset border stroke.
pub const INSET_COLOR: Rgba = Rgba::new(0, 0, 0, 128);

/// Bezier handle factor for quarter-circle corners.
const CIRCLE_KAPPA: f32 = 0.552_284_8;

/// Render `state` onto a new surface.
///
/// Returns `Ok(None)` when no image is loaded. Sizes are validated before
/// any pixels are produced.
pub fn render(state: &EditorState) -> ShotframeResult<Option<DrawingSurface>> {
    let Some(image) = state.image.as_ref() else {
        tracing::debug!("No source image loaded; nothing to composite");
        return Ok(None);
    };
    let pixmap = render_pixmap(state, image).map_err(log_rejected)?;
    Ok(Some(DrawingSurface::from_pixmap(pixmap)))
}

/// Render `state` into `surface`, resizing it to the composited size.
///
/// All-or-nothing: on error `surface` keeps its previous content. Without
/// a source image this is a no-op.
pub fn composite(state: &EditorState, surface: &mut DrawingSurface) -> ShotframeResult<()> {
    let Some(image) = state.image.as_ref() else {
        tracing::debug!("No source image loaded; nothing to composite");
        return Ok(());
    };
    let pixmap = render_pixmap(state, image).map_err(log_rejected)?;
    surface.replace(pixmap);
    Ok(())
}

fn log_rejected(error: ShotframeError) -> ShotframeError {
    tracing::warn!(error = %error, "Redraw rejected; previous surface kept");
    error
}

fn render_pixmap(state: &EditorState, image: &SourceImage) -> ShotframeResult<Pixmap> {
    let (image_w, image_h) = (image.width(), image.height());
    let (width, height) = state.output_size().ok_or_else(|| {
        ShotframeError::geometry(format!(
            "padding {} overflows surface size for {image_w}x{image_h}",
            state.padding
        ))
    })?;

    // A fresh pixmap is already cleared.
    let mut pixmap = allocate_pixmap(width, height)?;
    let source = pixmap_from_image(image.pixels())?;

    tracing::debug!(
        width,
        height,
        padding = state.padding,
        rotate = state.rotate,
        filter = ?state.filter,
        strokes = state.annotations.len(),
        "Compositing"
    );

    if let Background::Fill(fill) = &state.background {
        fill_background(&mut pixmap, fill)?;
    }

    let rotation = rotation_transform(state.rotate, width, height);
    let quality = if rotation.is_identity() {
        FilterQuality::Nearest
    } else {
        FilterQuality::Bilinear
    };

    let padding = state.padding as f32;
    let placement = rotation.pre_translate(padding, padding);

    if state.shadow > 0 {
        draw_drop_shadow(&mut pixmap, source.as_ref(), placement, quality, state.shadow)?;
    }

    let paint = PixmapPaint {
        quality,
        ..PixmapPaint::default()
    };
    pixmap.draw_pixmap(0, 0, source.as_ref(), &paint, placement, None);

    let image_rect = (padding, padding, image_w as f32, image_h as f32);

    if state.inset > 0 {
        stroke_inset(&mut pixmap, image_rect, state.inset as f32, rotation);
    }

    if state.corner_radius > 0 {
        mask_rounded_corners(&mut pixmap, image_rect, state.corner_radius as f32, rotation)?;
    }

    // Rotation ends here: filter and annotations use surface coordinates.
    if !state.filter.is_none() {
        apply_filter(&mut pixmap, state.filter);
    }

    draw_strokes(&mut pixmap, &state.annotations);

    Ok(pixmap)
}

/// Rotation about the surface center; identity at 0 (and 360) degrees.
fn rotation_transform(rotate: f32, width: u32, height: u32) -> Transform {
    let degrees = normalize_degrees(rotate);
    if degrees == 0.0 {
        Transform::identity()
    } else {
        Transform::from_rotate_at(degrees, width as f32 / 2.0, height as f32 / 2.0)
    }
}

fn fill_background(pixmap: &mut Pixmap, fill: &Fill) -> ShotframeResult<()> {
    match fill {
        Fill::Solid(color) => {
            pixmap.fill(to_skia_color(*color));
        }
        Fill::LinearGradient { angle_deg, stops } => {
            let (width, height) = (pixmap.width() as f32, pixmap.height() as f32);
            let (start, end) = gradient_line(*angle_deg, width, height);
            let fallback = stops.first().map(|stop| stop.color);
            let sk_stops: Vec<GradientStop> = stops
                .iter()
                .map(|stop| GradientStop::new(stop.offset, to_skia_color(stop.color)))
                .collect();

            match LinearGradient::new(start, end, sk_stops, SpreadMode::Pad, Transform::identity())
            {
                Some(shader) => {
                    let mut paint = Paint::default();
                    paint.shader = shader;
                    let rect = Rect::from_xywh(0.0, 0.0, width, height)
                        .ok_or_else(|| ShotframeError::render("invalid background bounds"))?;
                    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                }
                // Degenerate gradients paint their first color.
                None => {
                    if let Some(color) = fallback {
                        pixmap.fill(to_skia_color(color));
                    }
                }
            }
        }
    }
    Ok(())
}

/// CSS gradient line: passes through the center at `angle_deg` (0 = up,
/// clockwise), long enough that the corners get the end colors.
fn gradient_line(angle_deg: f32, width: f32, height: f32) -> (SkPoint, SkPoint) {
    let radians = angle_deg.to_radians();
    let (dx, dy) = (radians.sin(), -radians.cos());
    let half_len = (width * dx.abs() + height * dy.abs()) / 2.0;
    let (cx, cy) = (width / 2.0, height / 2.0);
    (
        SkPoint::from_xy(cx - dx * half_len, cy - dy * half_len),
        SkPoint::from_xy(cx + dx * half_len, cy + dy * half_len),
    )
}

/// Stroke a border of width `inset` just inside the image bounds.
fn stroke_inset(
    pixmap: &mut Pixmap,
    image_rect: (f32, f32, f32, f32),
    inset: f32,
    rotation: Transform,
) {
    let (x, y, w, h) = image_rect;
    let half = inset / 2.0;
    let Some(rect) = Rect::from_xywh(x + half, y + half, w - inset, h - inset) else {
        tracing::debug!(inset, "Inset wider than the image; skipping border");
        return;
    };

    let mut paint = Paint::default();
    paint.set_color(to_skia_color(INSET_COLOR));
    paint.anti_alias = true;

    let line = tiny_skia::Stroke {
        width: inset,
        ..tiny_skia::Stroke::default()
    };
    let path = PathBuilder::from_rect(rect);
    pixmap.stroke_path(&path, &paint, &line, rotation, None);
}

/// Keep only the pixels inside the rounded image rectangle
/// (destination-in over the whole surface).
fn mask_rounded_corners(
    pixmap: &mut Pixmap,
    image_rect: (f32, f32, f32, f32),
    radius: f32,
    rotation: Transform,
) -> ShotframeResult<()> {
    let (x, y, w, h) = image_rect;
    let path = rounded_rect_path(x, y, w, h, radius)
        .ok_or_else(|| ShotframeError::render("failed to build corner mask path"))?;

    surface_byte_len(pixmap.width(), pixmap.height())?;
    let mut mask = Mask::new(pixmap.width(), pixmap.height())
        .ok_or_else(|| ShotframeError::render("failed to allocate corner mask"))?;
    mask.fill_path(&path, FillRule::Winding, true, rotation);
    pixmap.apply_mask(&mask);
    Ok(())
}

/// Rounded rectangle; the radius is clamped to half the shorter side.
fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, radius: f32) -> Option<Path> {
    let r = radius.min(w / 2.0).min(h / 2.0).max(0.0);
    let k = r * CIRCLE_KAPPA;
    let (right, bottom) = (x + w, y + h);

    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(right - r, y);
    pb.cubic_to(right - r + k, y, right, y + r - k, right, y + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(x + r, bottom);
    pb.cubic_to(x + r - k, bottom, x, bottom - r + k, x, bottom - r);
    pb.line_to(x, y + r);
    pb.cubic_to(x, y + r - k, x + r - k, y, x + r, y);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba as Px, RgbaImage};
    use shotframe_editor_model::{Filter, Point, Stroke, Tool};

    fn checker(width: u32, height: u32) -> SourceImage {
        let mut image = RgbaImage::new(width, height);
        for (x, y, px) in image.enumerate_pixels_mut() {
            *px = if (x / 4 + y / 4) % 2 == 0 {
                Px([220, 40, 40, 255])
            } else {
                Px([30, 90, 200, 255])
            };
        }
        SourceImage::new(image)
    }

    fn state_with(image: SourceImage) -> EditorState {
        EditorState {
            image: Some(image),
            ..EditorState::default()
        }
    }

    #[test]
    fn test_no_image_is_noop() {
        let state = EditorState::default();
        assert!(render(&state).unwrap().is_none());

        let mut surface = DrawingSurface::new(3, 3).unwrap();
        let before = surface.clone();
        composite(&state, &mut surface).unwrap();
        assert_eq!(surface, before);
    }

    #[test]
    fn test_surface_sized_with_padding() {
        let mut state = state_with(checker(30, 20));
        state.padding = 7;
        let surface = render(&state).unwrap().unwrap();
        assert_eq!((surface.width(), surface.height()), (44, 34));
    }

    #[test]
    fn test_zero_sized_image_fails_without_touching_surface() {
        let state = state_with(SourceImage::new(RgbaImage::new(0, 0)));
        let mut surface = DrawingSurface::new(2, 2).unwrap();
        let before = surface.clone();

        let err = composite(&state, &mut surface).unwrap_err();
        assert!(matches!(err, ShotframeError::Geometry { .. }));
        assert_eq!(surface, before);
    }

    #[test]
    fn test_padding_overflow_is_geometry_error() {
        let mut state = state_with(checker(4, 4));
        state.padding = u32::MAX;
        assert!(matches!(
            render(&state),
            Err(ShotframeError::Geometry { .. })
        ));
    }

    #[test]
    fn test_solid_background_fills_padding() {
        let mut state = state_with(checker(8, 8));
        state.padding = 4;
        state.background = Background::solid(Rgba::rgb(10, 20, 30));
        let surface = render(&state).unwrap().unwrap();
        assert_eq!(surface.pixel(0, 0), Some(Rgba::rgb(10, 20, 30)));
        assert_eq!(surface.pixel(4, 4), Some(Rgba::rgb(220, 40, 40)));
    }

    #[test]
    fn test_gradient_background_runs_between_stops() {
        let mut state = state_with(checker(8, 8));
        state.padding = 20;
        state.background = "linear-gradient(90deg, #000000, #ffffff)".parse().unwrap();
        let surface = render(&state).unwrap().unwrap();

        let left = surface.pixel(0, 24).unwrap();
        let right = surface.pixel(47, 24).unwrap();
        assert!(left.r < 20);
        assert!(right.r > 235);
        assert_eq!(left.a, 255);
    }

    #[test]
    fn test_corner_radius_clears_corners() {
        let mut state = state_with(checker(40, 40));
        state.corner_radius = 12;
        let surface = render(&state).unwrap().unwrap();
        assert_eq!(surface.pixel(0, 0).unwrap().a, 0);
        assert_eq!(surface.pixel(39, 39).unwrap().a, 0);
        assert_eq!(surface.pixel(20, 20).unwrap().a, 255);
        assert_eq!(surface.pixel(20, 0).unwrap().a, 255);
    }

    #[test]
    fn test_inset_darkens_border_only() {
        let plain = state_with(checker(40, 40));
        let mut inset = plain.clone();
        inset.inset = 4;

        let a = render(&plain).unwrap().unwrap();
        let b = render(&inset).unwrap().unwrap();

        let edge_plain = a.pixel(1, 20).unwrap();
        let edge_inset = b.pixel(1, 20).unwrap();
        assert!(edge_inset.r < edge_plain.r || edge_inset.b < edge_plain.b);
        assert_eq!(a.pixel(20, 20), b.pixel(20, 20));
    }

    #[test]
    fn test_shadow_lands_in_padding() {
        let mut state = state_with(checker(20, 20));
        state.padding = 10;
        state.shadow = 8;
        let surface = render(&state).unwrap().unwrap();

        // Below-right of the image gets shadow; above-left stays clear.
        assert!(surface.pixel(33, 33).unwrap().a > 0);
        assert_eq!(surface.pixel(1, 1).unwrap().a, 0);
    }

    #[test]
    fn test_rotation_moves_content() {
        let mut state = state_with(checker(40, 10));
        state.padding = 20;
        let upright = render(&state).unwrap().unwrap();
        state.rotate = 90.0;
        let rotated = render(&state).unwrap().unwrap();

        assert_eq!((rotated.width(), rotated.height()), (80, 50));
        // The wide image turned upright covers the center column top.
        assert_eq!(upright.pixel(40, 12).unwrap().a, 0);
        assert_eq!(rotated.pixel(40, 12).unwrap().a, 255);
    }

    #[test]
    fn test_annotations_are_not_filtered() {
        let mut state = state_with(checker(20, 20));
        state.filter = Filter::Grayscale;
        state.annotations.push(Stroke::segment(
            Point::new(0.0, 10.0),
            Point::new(20.0, 10.0),
            Rgba::rgb(0, 255, 0),
            4.0,
            Tool::Pen,
        ));
        let surface = render(&state).unwrap().unwrap();
        assert_eq!(surface.pixel(10, 10), Some(Rgba::rgb(0, 255, 0)));
        let other = surface.pixel(10, 2).unwrap();
        assert_eq!(other.r, other.g);
    }

    #[test]
    fn test_rounded_path_clamps_radius() {
        let path = rounded_rect_path(0.0, 0.0, 10.0, 4.0, 50.0).unwrap();
        let bounds = path.bounds();
        assert_eq!(bounds.width(), 10.0);
        assert_eq!(bounds.height(), 4.0);
    }
}
