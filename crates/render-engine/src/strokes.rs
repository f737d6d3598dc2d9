//! Annotation stroke painting.

use tiny_skia::{LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use shotframe_editor_model::Stroke;

use crate::surface::to_skia_color;

/// Paint one stroke in surface coordinates. Undrawable strokes are skipped.
pub fn draw_stroke(pixmap: &mut Pixmap, stroke: &Stroke) {
    if !stroke.is_drawable() {
        return;
    }

    let mut builder = PathBuilder::new();
    let first = stroke.path[0];
    builder.move_to(first.x as f32, first.y as f32);
    for point in &stroke.path[1..] {
        builder.line_to(point.x as f32, point.y as f32);
    }
    let Some(path) = builder.finish() else {
        tracing::trace!("Skipping stroke with empty path");
        return;
    };

    let mut paint = Paint::default();
    paint.set_color(to_skia_color(stroke.paint_color()));
    paint.anti_alias = true;

    let line = tiny_skia::Stroke {
        width: stroke.size,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    };
    pixmap.stroke_path(&path, &paint, &line, Transform::identity(), None);
}

/// Replay strokes in recorded order.
pub fn draw_strokes(pixmap: &mut Pixmap, strokes: &[Stroke]) {
    for stroke in strokes {
        draw_stroke(pixmap, stroke);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotframe_editor_model::{Point, Rgba, Tool};

    fn line(from: (f64, f64), to: (f64, f64), color: Rgba, tool: Tool) -> Stroke {
        Stroke::segment(
            Point::new(from.0, from.1),
            Point::new(to.0, to.1),
            color,
            4.0,
            tool,
        )
    }

    #[test]
    fn test_stroke_paints_along_segment() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        draw_stroke(
            &mut pixmap,
            &line((2.0, 10.0), (18.0, 10.0), Rgba::rgb(255, 0, 0), Tool::Pen),
        );

        let on = pixmap.pixel(10, 10).unwrap().demultiply();
        assert_eq!((on.red(), on.green(), on.alpha()), (255, 0, 255));
        assert_eq!(pixmap.pixel(10, 2).unwrap().alpha(), 0);
    }

    #[test]
    fn test_later_strokes_paint_over_earlier() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        draw_strokes(
            &mut pixmap,
            &[
                line((2.0, 10.0), (18.0, 10.0), Rgba::rgb(255, 0, 0), Tool::Pen),
                line((10.0, 2.0), (10.0, 18.0), Rgba::rgb(0, 0, 255), Tool::Pen),
            ],
        );
        let crossing = pixmap.pixel(10, 10).unwrap().demultiply();
        assert_eq!((crossing.red(), crossing.blue()), (0, 255));
    }

    #[test]
    fn test_highlighter_is_translucent() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        draw_stroke(
            &mut pixmap,
            &line((2.0, 10.0), (18.0, 10.0), Rgba::rgb(255, 255, 0), Tool::Highlighter),
        );
        let alpha = pixmap.pixel(10, 10).unwrap().alpha();
        assert!(alpha > 90 && alpha < 115);
    }
}
