//! Shotframe Editor Model
//!
//! Defines the data contracts of an editing session:
//! - **State:** the immutable [`EditorState`] snapshot and its style types
//!   (background fill, filter, tool)
//! - **Actions:** the pure [`reduce`] function producing the next snapshot
//! - **Annotations:** recorded [`Stroke`] segments and the
//!   [`AnnotationRecorder`] gesture state machine
//!
//! All coordinates are in output-surface pixels, i.e. the composited image
//! including padding.

pub mod action;
pub mod annotation;
pub mod color;
pub mod geometry;
pub mod source;
pub mod state;

pub use action::*;
pub use annotation::*;
pub use color::*;
pub use geometry::*;
pub use source::*;
pub use state::*;
