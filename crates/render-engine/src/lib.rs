//! Shotframe Render Engine
//!
//! Turns an [`EditorState`](shotframe_editor_model::EditorState) snapshot
//! into a composited raster. Every redraw is a full replay from the
//! snapshot and the untouched source image.
//!
//! # Pipeline
//!
//! ```text
//! source image ──┐
//!                ├── Size surface (w + 2p, h + 2p), clear
//! background ────┘         │
//!                          ├── Background fill
//!                          │
//!        ┌── rotate about center ────────────────┐
//!        │   Drop shadow → Image → Inset stroke  │
//!        │   → Rounded-corner mask               │
//!        └───────────────────────────────────────┘
//!                          │
//!                          ├── Post filter (whole surface)
//! annotations ─────────────┘         │
//!                                    ├── Stroke replay
//!                                    ▼
//!                              DrawingSurface ── crop / PNG export
//! ```

pub mod compositor;
pub mod crop;
pub mod effects;
pub mod export;
pub mod session;
pub mod strokes;
pub mod surface;

pub use compositor::{composite, render};
pub use crop::compute_crop;
pub use export::{encode_png, ExportOptions};
pub use session::{EditorSession, Gesture};
pub use surface::DrawingSurface;
