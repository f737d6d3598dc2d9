//! Freehand annotation strokes and the gesture recorder.
//!
//! Every pointer move during a gesture produces its own two-point
//! [`Stroke`]; undo therefore removes the most recent move, not the whole
//! gesture.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::geometry::Point;
use crate::state::{EditorState, Tool};

/// Alpha factor applied to highlighter strokes.
pub const HIGHLIGHTER_OPACITY: f32 = 0.4;

/// One recorded annotation segment. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Ordered points; always at least two.
    pub path: Vec<Point>,
    pub color: Rgba,
    pub size: f32,
    pub tool: Tool,
}

impl Stroke {
    /// A two-point segment stroke.
    pub fn segment(from: Point, to: Point, color: Rgba, size: f32, tool: Tool) -> Self {
        Self {
            path: vec![from, to],
            color,
            size,
            tool,
        }
    }

    /// Color actually painted, after the tool's opacity.
    pub fn paint_color(&self) -> Rgba {
        match self.tool {
            Tool::Highlighter => self.color.with_alpha_scaled(HIGHLIGHTER_OPACITY),
            _ => self.color,
        }
    }

    /// Whether the stroke can be painted (two or more finite points,
    /// positive width).
    pub fn is_drawable(&self) -> bool {
        self.path.len() >= 2
            && self.size.is_finite()
            && self.size > 0.0
            && self.path.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

/// Recorder phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecorderPhase {
    Idle,
    Drawing { last: Point },
}

/// Gesture state machine turning pointer input into strokes.
///
/// The recorder never mutates [`EditorState`]; it hands back strokes for
/// the caller to append through the reducer.
#[derive(Debug, Clone)]
pub struct AnnotationRecorder {
    phase: RecorderPhase,
}

impl Default for AnnotationRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationRecorder {
    pub fn new() -> Self {
        Self {
            phase: RecorderPhase::Idle,
        }
    }

    pub fn phase(&self) -> RecorderPhase {
        self.phase
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.phase, RecorderPhase::Drawing { .. })
    }

    /// Start a gesture at `point`. Only annotation tools enter the drawing
    /// phase; returns whether drawing started. Nothing is appended yet.
    pub fn begin_stroke(&mut self, tool: Tool, point: Point) -> bool {
        if !tool.is_annotation() {
            return false;
        }
        self.phase = RecorderPhase::Drawing { last: point };
        tracing::trace!(x = point.x, y = point.y, "Gesture started");
        true
    }

    /// Continue the gesture to `point`, returning the segment from the last
    /// recorded point. Pen parameters come from `state` at call time.
    /// Returns `None` when idle.
    pub fn extend_stroke(&mut self, state: &EditorState, point: Point) -> Option<Stroke> {
        let RecorderPhase::Drawing { last } = self.phase else {
            return None;
        };
        self.phase = RecorderPhase::Drawing { last: point };
        Some(Stroke::segment(
            last,
            point,
            state.pen_color,
            state.pen_size,
            state.current_tool,
        ))
    }

    /// End the gesture (pointer released or left the drawable area).
    pub fn end_stroke(&mut self) {
        if self.is_drawing() {
            tracing::trace!("Gesture ended");
        }
        self.phase = RecorderPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pen_state() -> EditorState {
        EditorState {
            current_tool: Tool::Pen,
            pen_color: Rgba::rgb(0, 0, 255),
            pen_size: 4.0,
            ..EditorState::default()
        }
    }

    #[test]
    fn test_begin_requires_annotation_tool() {
        let mut recorder = AnnotationRecorder::new();
        assert!(!recorder.begin_stroke(Tool::Pointer, Point::new(1.0, 1.0)));
        assert!(!recorder.begin_stroke(Tool::Crop, Point::new(1.0, 1.0)));
        assert!(!recorder.is_drawing());

        assert!(recorder.begin_stroke(Tool::Highlighter, Point::new(1.0, 1.0)));
        assert!(recorder.is_drawing());
    }

    #[test]
    fn test_extend_chains_segments() {
        let state = pen_state();
        let mut recorder = AnnotationRecorder::new();
        recorder.begin_stroke(Tool::Pen, Point::new(0.0, 0.0));

        let first = recorder.extend_stroke(&state, Point::new(5.0, 0.0)).unwrap();
        let second = recorder.extend_stroke(&state, Point::new(5.0, 5.0)).unwrap();

        assert_eq!(first.path, vec![Point::new(0.0, 0.0), Point::new(5.0, 0.0)]);
        assert_eq!(second.path, vec![Point::new(5.0, 0.0), Point::new(5.0, 5.0)]);
        assert_eq!(second.color, Rgba::rgb(0, 0, 255));
        assert_eq!(second.size, 4.0);
        assert_eq!(second.tool, Tool::Pen);
    }

    #[test]
    fn test_extend_when_idle_is_ignored() {
        let state = pen_state();
        let mut recorder = AnnotationRecorder::new();
        assert!(recorder.extend_stroke(&state, Point::new(1.0, 1.0)).is_none());

        recorder.begin_stroke(Tool::Pen, Point::new(0.0, 0.0));
        recorder.end_stroke();
        assert!(recorder.extend_stroke(&state, Point::new(1.0, 1.0)).is_none());
        assert_eq!(recorder.phase(), RecorderPhase::Idle);
    }

    #[test]
    fn test_pen_changes_are_not_retroactive() {
        let mut state = pen_state();
        let mut recorder = AnnotationRecorder::new();
        recorder.begin_stroke(Tool::Pen, Point::new(0.0, 0.0));
        let before = recorder.extend_stroke(&state, Point::new(1.0, 0.0)).unwrap();

        state.pen_color = Rgba::rgb(255, 255, 0);
        let after = recorder.extend_stroke(&state, Point::new(2.0, 0.0)).unwrap();

        assert_eq!(before.color, Rgba::rgb(0, 0, 255));
        assert_eq!(after.color, Rgba::rgb(255, 255, 0));
    }

    #[test]
    fn test_highlighter_paint_color() {
        let stroke = Stroke::segment(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Rgba::rgb(255, 255, 0),
            10.0,
            Tool::Highlighter,
        );
        assert_eq!(stroke.paint_color().a, 102);
        assert!(stroke.is_drawable());
    }

    #[test]
    fn test_drawable_rejects_bad_strokes() {
        let mut stroke = Stroke::segment(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Rgba::BLACK,
            0.0,
            Tool::Pen,
        );
        assert!(!stroke.is_drawable());
        stroke.size = 2.0;
        stroke.path.truncate(1);
        assert!(!stroke.is_drawable());
    }
}
