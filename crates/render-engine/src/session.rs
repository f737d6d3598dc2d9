//! Interactive editing session.
//!
//! An [`EditorSession`] owns the latest state snapshot, the live surface,
//! and the annotation recorder. Edits go through [`EditorSession::dispatch`];
//! pointer input goes through a [`Gesture`] guard that always ends the
//! gesture when it is released, leaves the drawable area, or is dropped.

use shotframe_common::error::ShotframeResult;
use shotframe_editor_model::{
    reduce, Action, AnnotationRecorder, EditorState, Point, Rect, Size, SourceImage, Tool,
};

use crate::compositor::render;
use crate::crop::compute_crop;
use crate::export::{encode_png, ExportOptions};
use crate::strokes::draw_stroke;
use crate::surface::DrawingSurface;

/// One editing session.
#[derive(Debug)]
pub struct EditorSession {
    state: EditorState,
    recorder: AnnotationRecorder,
    surface: Option<DrawingSurface>,
}

impl EditorSession {
    pub fn new(initial: EditorState) -> Self {
        Self {
            state: initial,
            recorder: AnnotationRecorder::new(),
            surface: None,
        }
    }

    /// Latest state snapshot.
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Live surface; `None` until an image has been composited.
    pub fn surface(&self) -> Option<&DrawingSurface> {
        self.surface.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }

    /// Apply an edit and recomposite if it changes the picture.
    ///
    /// The new snapshot is kept even when the redraw fails; the surface then
    /// still shows the last good render.
    pub fn dispatch(&mut self, action: Action) -> ShotframeResult<()> {
        let redraw = action.invalidates_render();
        self.state = reduce(&self.state, action);
        if redraw {
            self.recomposite()?;
        }
        Ok(())
    }

    pub fn load_image(&mut self, image: SourceImage) -> ShotframeResult<()> {
        tracing::info!(
            width = image.width(),
            height = image.height(),
            "Loading source image"
        );
        self.dispatch(Action::LoadImage(image))
    }

    /// Full redraw from the current snapshot.
    pub fn recomposite(&mut self) -> ShotframeResult<()> {
        if let Some(surface) = render(&self.state)? {
            self.surface = Some(surface);
        }
        Ok(())
    }

    /// Remove the last recorded stroke and redraw. No-op when empty.
    pub fn undo(&mut self) -> ShotframeResult<()> {
        if self.state.annotations.is_empty() {
            return Ok(());
        }
        self.dispatch(Action::UndoStroke)
    }

    /// Start a pointer gesture at `point` with the current tool.
    ///
    /// Returns `None` for tools that do not take gestures or when no image
    /// is loaded.
    pub fn begin_gesture(&mut self, point: Point) -> Option<Gesture<'_>> {
        if self.surface.is_none() {
            return None;
        }
        let kind = match self.state.current_tool {
            tool if tool.is_annotation() => {
                self.recorder.begin_stroke(tool, point);
                GestureKind::Annotate
            }
            Tool::Crop => {
                self.state = reduce(&self.state, Action::SetCrop(None));
                GestureKind::SelectCrop { anchor: point }
            }
            _ => return None,
        };
        Some(Gesture {
            session: self,
            kind,
        })
    }

    /// Crop the displayed composite and load the result as the new source.
    ///
    /// `displayed` is the on-screen size of the surface and `selection` is
    /// in those on-screen coordinates. Returns whether a crop was applied.
    pub fn apply_crop(&mut self, displayed: Size, selection: Rect) -> ShotframeResult<bool> {
        let Some(surface) = self.surface.as_ref() else {
            return Ok(false);
        };
        let Some(cropped) = compute_crop(&surface.to_rgba_image(), displayed, selection) else {
            return Ok(false);
        };
        self.load_image(SourceImage::new(cropped))?;
        Ok(true)
    }

    /// Apply the pending crop selection, which is in surface pixels.
    pub fn commit_crop_selection(&mut self) -> ShotframeResult<bool> {
        let (Some(selection), Some(surface)) = (self.state.crop, self.surface.as_ref()) else {
            return Ok(false);
        };
        let displayed = Size::new(surface.width() as f64, surface.height() as f64);
        self.apply_crop(displayed, selection)
    }

    /// Encode the current surface; `None` when nothing has been rendered.
    pub fn export(&self, options: &ExportOptions) -> ShotframeResult<Option<Vec<u8>>> {
        self.surface
            .as_ref()
            .map(|surface| encode_png(surface, options))
            .transpose()
    }
}

#[derive(Debug, Clone, Copy)]
enum GestureKind {
    Annotate,
    SelectCrop { anchor: Point },
}

/// A pointer gesture in progress. Ending it is guaranteed: explicitly via
/// [`Gesture::release`] or [`Gesture::leave`], or implicitly on drop.
#[derive(Debug)]
pub struct Gesture<'a> {
    session: &'a mut EditorSession,
    kind: GestureKind,
}

impl Gesture<'_> {
    /// Pointer moved to `point`.
    ///
    /// Annotating draws the new segment straight onto the live surface and
    /// appends it to the state; crop selection updates the pending rect.
    pub fn move_to(&mut self, point: Point) {
        match self.kind {
            GestureKind::Annotate => {
                let session = &mut *self.session;
                let Some(stroke) = session.recorder.extend_stroke(&session.state, point) else {
                    return;
                };
                if let Some(surface) = session.surface.as_mut() {
                    draw_stroke(surface.pixmap_mut(), &stroke);
                }
                session.state = reduce(&session.state, Action::AppendStroke(stroke));
            }
            GestureKind::SelectCrop { anchor } => {
                let rect = Rect::from_corners(anchor, point);
                self.session.state = reduce(&self.session.state, Action::SetCrop(Some(rect)));
            }
        }
    }

    /// Pointer button released.
    pub fn release(self) {}

    /// Pointer left the drawable area.
    pub fn leave(self) {}
}

impl Drop for Gesture<'_> {
    fn drop(&mut self) {
        self.session.recorder.end_stroke();
    }
}
