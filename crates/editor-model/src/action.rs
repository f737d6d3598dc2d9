//! State transitions.
//!
//! [`reduce`] is the only way a session moves from one [`EditorState`]
//! snapshot to the next. It is pure: the previous snapshot is left intact.

use crate::annotation::Stroke;
use crate::color::{Background, Rgba};
use crate::geometry::Rect;
use crate::source::SourceImage;
use crate::state::{normalize_degrees, sanitize_pen_size, EditorState, Filter, Tool};

/// A single user edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Replace the source image. Clears annotations and the crop selection,
    /// which were expressed in the previous image's coordinates.
    LoadImage(SourceImage),
    SetBackground(Background),
    SetPadding(u32),
    SetInset(u32),
    SetShadow(u32),
    SetCornerRadius(u32),
    /// Degrees; wrapped into `[0, 360)`.
    SetRotate(f32),
    SetFilter(Filter),
    SetPenColor(Rgba),
    SetPenSize(f32),
    SetTool(Tool),
    AppendStroke(Stroke),
    /// Remove the most recently appended stroke; no-op when there is none.
    UndoStroke,
    ClearAnnotations,
    SetCrop(Option<Rect>),
    /// Restore every setting to `defaults`, keeping the loaded image.
    Reset(Box<EditorState>),
}

impl Action {
    /// Whether applying this action changes the composited picture.
    ///
    /// Pen, tool, and crop-selection edits only affect future input.
    pub fn invalidates_render(&self) -> bool {
        !matches!(
            self,
            Action::SetPenColor(_) | Action::SetPenSize(_) | Action::SetTool(_) | Action::SetCrop(_)
        )
    }
}

/// Produce the snapshot that follows `state` after `action`.
pub fn reduce(state: &EditorState, action: Action) -> EditorState {
    let mut next = state.clone();
    match action {
        Action::LoadImage(image) => {
            next.image = Some(image);
            next.annotations.clear();
            next.crop = None;
        }
        Action::SetBackground(background) => next.background = background,
        Action::SetPadding(padding) => next.padding = padding,
        Action::SetInset(inset) => next.inset = inset,
        Action::SetShadow(shadow) => next.shadow = shadow,
        Action::SetCornerRadius(radius) => next.corner_radius = radius,
        Action::SetRotate(degrees) => next.rotate = normalize_degrees(degrees),
        Action::SetFilter(filter) => next.filter = filter,
        Action::SetPenColor(color) => next.pen_color = color,
        Action::SetPenSize(size) => next.pen_size = sanitize_pen_size(size),
        Action::SetTool(tool) => {
            next.current_tool = tool;
            if tool != Tool::Crop {
                next.crop = None;
            }
        }
        Action::AppendStroke(stroke) => {
            if stroke.is_drawable() {
                next.annotations.push(stroke);
            } else {
                tracing::debug!(points = stroke.path.len(), "Ignoring undrawable stroke");
            }
        }
        Action::UndoStroke => {
            next.annotations.pop();
        }
        Action::ClearAnnotations => next.annotations.clear(),
        Action::SetCrop(rect) => next.crop = rect,
        Action::Reset(defaults) => {
            let image = next.image.take();
            let defaults = *defaults;
            next = EditorState { image, ..defaults };
        }
    }
    next
}
