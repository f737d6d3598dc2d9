//! Editor state snapshot and its style parameters.

use serde::{Deserialize, Serialize};

use shotframe_common::config::EditorDefaults;
use shotframe_common::error::{ShotframeError, ShotframeResult};

use crate::annotation::Stroke;
use crate::color::{Background, Rgba};
use crate::geometry::Rect;
use crate::source::SourceImage;

/// Post-composite filter. Closed set; brightness and contrast carry an
/// intensity in percent (100 = unchanged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Filter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Blur,
    Invert,
    Brightness {
        percent: u32,
    },
    Contrast {
        percent: u32,
    },
}

/// Blur radius of [`Filter::Blur`], in pixels.
pub const BLUR_FILTER_RADIUS_PX: u32 = 5;

impl Filter {
    /// Build a filter from its control name. `amount` is only read by
    /// brightness and contrast and defaults to 100%.
    pub fn from_name(name: &str, amount: Option<u32>) -> Option<Filter> {
        let percent = amount.unwrap_or(100);
        match name.trim().to_ascii_lowercase().as_str() {
            "none" => Some(Filter::None),
            "grayscale" => Some(Filter::Grayscale),
            "sepia" => Some(Filter::Sepia),
            "blur" => Some(Filter::Blur),
            "invert" => Some(Filter::Invert),
            "brightness" => Some(Filter::Brightness { percent }),
            "contrast" => Some(Filter::Contrast { percent }),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Filter::None)
    }

    /// The CSS filter function for this filter, or `None` for [`Filter::None`].
    pub fn css_function(&self) -> Option<String> {
        match self {
            Filter::None => None,
            Filter::Grayscale => Some("grayscale(100%)".to_string()),
            Filter::Sepia => Some("sepia(100%)".to_string()),
            Filter::Blur => Some(format!("blur({BLUR_FILTER_RADIUS_PX}px)")),
            Filter::Invert => Some("invert(100%)".to_string()),
            Filter::Brightness { percent } => Some(format!("brightness({percent}%)")),
            Filter::Contrast { percent } => Some(format!("contrast({percent}%)")),
        }
    }
}

/// Active top-level tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Adjustments only; pointer gestures are ignored.
    #[default]
    Pointer,
    /// Freehand annotation.
    Pen,
    /// Freehand annotation painted translucent.
    Highlighter,
    /// Crop selection.
    Crop,
}

impl Tool {
    /// Whether gestures with this tool record annotation strokes.
    pub fn is_annotation(&self) -> bool {
        matches!(self, Tool::Pen | Tool::Highlighter)
    }
}

/// One immutable snapshot of an editing session.
///
/// Snapshots are produced by [`crate::reduce`]; the compositor reads only
/// the latest one. The source image is not serialized, so a saved state
/// document carries settings and annotations only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorState {
    /// Loaded source raster, absent until an upload or capture completes.
    #[serde(skip)]
    pub image: Option<SourceImage>,

    pub background: Background,

    /// Transparent (or background-filled) margin around the image, in px.
    pub padding: u32,

    /// Width of the darkened inner border, in px.
    pub inset: u32,

    /// Drop-shadow blur radius, in px.
    pub shadow: u32,

    pub corner_radius: u32,

    /// Clockwise rotation in degrees, kept in `[0, 360)`.
    pub rotate: f32,

    pub filter: Filter,

    /// Recorded strokes in paint order.
    pub annotations: Vec<Stroke>,

    pub pen_color: Rgba,
    pub pen_size: f32,
    pub current_tool: Tool,

    /// Pending crop selection in output-surface coordinates.
    pub crop: Option<Rect>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            image: None,
            background: Background::None,
            padding: 0,
            inset: 0,
            shadow: 0,
            corner_radius: 0,
            rotate: 0.0,
            filter: Filter::None,
            annotations: Vec::new(),
            pen_color: Rgba::rgb(255, 0, 0),
            pen_size: 3.0,
            current_tool: Tool::Pointer,
            crop: None,
        }
    }
}

impl EditorState {
    /// Fresh session state from configured defaults.
    pub fn from_defaults(defaults: &EditorDefaults) -> ShotframeResult<Self> {
        let background = defaults
            .background
            .parse()
            .map_err(|e| ShotframeError::config(format!("editor.background: {e}")))?;
        let pen_color = defaults
            .pen_color
            .parse()
            .map_err(|e| ShotframeError::config(format!("editor.pen_color: {e}")))?;

        Ok(Self {
            background,
            padding: defaults.padding,
            inset: defaults.inset,
            shadow: defaults.shadow,
            corner_radius: defaults.corner_radius,
            pen_color,
            pen_size: sanitize_pen_size(defaults.pen_size),
            ..Self::default()
        })
    }

    /// Parse a saved state document (settings and annotations).
    pub fn from_json(json: &str) -> ShotframeResult<Self> {
        let mut state: EditorState = serde_json::from_str(json)?;
        state.rotate = normalize_degrees(state.rotate);
        state.pen_size = sanitize_pen_size(state.pen_size);
        Ok(state)
    }

    pub fn to_json(&self) -> ShotframeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Composited surface size for the loaded image:
    /// `(width + 2*padding, height + 2*padding)`.
    ///
    /// `None` when no image is loaded or the size overflows.
    pub fn output_size(&self) -> Option<(u32, u32)> {
        let image = self.image.as_ref()?;
        output_size_for(image.width(), image.height(), self.padding)
    }
}

/// `(width + 2*padding, height + 2*padding)` with overflow checking.
pub fn output_size_for(width: u32, height: u32, padding: u32) -> Option<(u32, u32)> {
    let margin = padding.checked_mul(2)?;
    Some((width.checked_add(margin)?, height.checked_add(margin)?))
}

/// Wrap an angle into `[0, 360)`. Non-finite input maps to 0.
pub fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

pub(crate) fn sanitize_pen_size(size: f32) -> f32 {
    if size.is_finite() && size > 0.0 {
        size
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_filter_css_functions() {
        assert_eq!(Filter::None.css_function(), None);
        assert_eq!(
            Filter::Grayscale.css_function().unwrap(),
            "grayscale(100%)"
        );
        assert_eq!(Filter::Sepia.css_function().unwrap(), "sepia(100%)");
        assert_eq!(Filter::Blur.css_function().unwrap(), "blur(5px)");
        assert_eq!(Filter::Invert.css_function().unwrap(), "invert(100%)");
        assert_eq!(
            Filter::Brightness { percent: 150 }.css_function().unwrap(),
            "brightness(150%)"
        );
        assert_eq!(
            Filter::Contrast { percent: 80 }.css_function().unwrap(),
            "contrast(80%)"
        );
    }

    #[test]
    fn test_filter_from_name() {
        assert_eq!(Filter::from_name("Sepia", None), Some(Filter::Sepia));
        assert_eq!(
            Filter::from_name("brightness", Some(120)),
            Some(Filter::Brightness { percent: 120 })
        );
        assert_eq!(
            Filter::from_name("contrast", None),
            Some(Filter::Contrast { percent: 100 })
        );
        assert_eq!(Filter::from_name("vignette", None), None);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(f32::NAN), 0.0);
    }

    #[test]
    fn test_output_size() {
        let mut state = EditorState::default();
        assert_eq!(state.output_size(), None);

        state.image = Some(SourceImage::new(RgbaImage::new(800, 600)));
        state.padding = 20;
        assert_eq!(state.output_size(), Some((840, 640)));

        assert_eq!(output_size_for(u32::MAX, 10, 1), None);
    }

    #[test]
    fn test_from_defaults() {
        let defaults = EditorDefaults {
            padding: 16,
            background: "#000".to_string(),
            pen_color: "#00ff00".to_string(),
            ..EditorDefaults::default()
        };
        let state = EditorState::from_defaults(&defaults).unwrap();
        assert_eq!(state.padding, 16);
        assert_eq!(state.background, Background::solid(Rgba::BLACK));
        assert_eq!(state.pen_color, Rgba::rgb(0, 255, 0));
        assert!(state.annotations.is_empty());

        let bad = EditorDefaults {
            pen_color: "blurple".to_string(),
            ..EditorDefaults::default()
        };
        assert!(matches!(
            EditorState::from_defaults(&bad),
            Err(ShotframeError::Config { .. })
        ));
    }

    #[test]
    fn test_state_document_roundtrip_skips_image() {
        let mut state = EditorState {
            padding: 24,
            rotate: 45.0,
            filter: Filter::Brightness { percent: 130 },
            ..EditorState::default()
        };
        state.image = Some(SourceImage::new(RgbaImage::new(4, 4)));

        let json = state.to_json().unwrap();
        assert!(json.contains("\"kind\": \"brightness\""));

        let loaded = EditorState::from_json(&json).unwrap();
        assert!(loaded.image.is_none());
        assert_eq!(loaded.padding, 24);
        assert_eq!(loaded.filter, Filter::Brightness { percent: 130 });
    }

    #[test]
    fn test_state_document_normalizes_rotation() {
        let loaded = EditorState::from_json(r#"{ "rotate": 720.0, "pen_size": -2 }"#).unwrap();
        assert_eq!(loaded.rotate, 0.0);
        assert_eq!(loaded.pen_size, 1.0);
    }
}
