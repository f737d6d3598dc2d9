//! Colors and background fills.
//!
//! Both accept the CSS-style strings the editor controls produce and
//! serialize back to them, so saved state documents stay readable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error produced when a color or fill string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{input}'")]
pub struct ParseColorError {
    kind: &'static str,
    input: String,
}

impl ParseColorError {
    fn new(kind: &'static str, input: &str) -> Self {
        Self {
            kind,
            input: input.to_string(),
        }
    }
}

/// Straight (non-premultiplied) 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Same color with its alpha scaled by `factor` (clamped to `[0, 1]`).
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    fn parse_functional(body: &str, with_alpha: bool) -> Option<Self> {
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }
        let channel = |s: &str| s.parse::<u16>().ok().filter(|v| *v <= 255).map(|v| v as u8);
        let alpha = if with_alpha {
            let a = parts[3].parse::<f32>().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            (a * 255.0).round() as u8
        } else {
            255
        };
        Some(Self::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }
}

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        let parsed = if let Some(hex) = lower.strip_prefix('#') {
            Self::parse_hex(hex)
        } else if let Some(body) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Self::parse_functional(body, true)
        } else if let Some(body) = lower
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            Self::parse_functional(body, false)
        } else {
            match lower.as_str() {
                "black" => Some(Self::BLACK),
                "white" => Some(Self::WHITE),
                "transparent" => Some(Self::TRANSPARENT),
                _ => None,
            }
        };
        parsed.ok_or_else(|| ParseColorError::new("color", s))
    }
}

impl TryFrom<String> for Rgba {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// One color stop of a linear gradient; `offset` is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Paint used to flood the whole output surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    /// CSS angle convention: 0deg points up, 90deg points right.
    LinearGradient {
        angle_deg: f32,
        stops: Vec<GradientStop>,
    },
}

/// Surface background: the literal `none` or a fill.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    #[default]
    None,
    Fill(Fill),
}

impl Background {
    pub fn is_none(&self) -> bool {
        matches!(self, Background::None)
    }

    pub fn solid(color: Rgba) -> Self {
        Background::Fill(Fill::Solid(color))
    }
}

/// CSS default for `linear-gradient(...)` without an angle ("to bottom").
const DEFAULT_GRADIENT_ANGLE: f32 = 180.0;

/// Angle for a `to <side>` direction; corners use the diagonal.
fn side_angle(side: &str) -> Option<f32> {
    let mut vertical = None;
    let mut horizontal = None;
    for word in side.split_whitespace() {
        match word {
            "top" if vertical.is_none() => vertical = Some(0.0),
            "bottom" if vertical.is_none() => vertical = Some(180.0),
            "left" if horizontal.is_none() => horizontal = Some(270.0),
            "right" if horizontal.is_none() => horizontal = Some(90.0),
            _ => return None,
        }
    }
    match (vertical, horizontal) {
        (Some(v), None) => Some(v),
        (None, Some(h)) => Some(h),
        (Some(v), Some(h)) => Some(match (v == 0.0, h == 90.0) {
            (true, true) => 45.0,
            (false, true) => 135.0,
            (false, false) => 225.0,
            (true, false) => 315.0,
        }),
        (None, None) => None,
    }
}

fn parse_gradient(body: &str, original: &str) -> Result<Fill, ParseColorError> {
    let err = || ParseColorError::new("gradient", original);
    let args = split_top_level(body);
    let mut args = args.iter().map(|s| s.trim()).peekable();

    let mut angle_deg = DEFAULT_GRADIENT_ANGLE;
    if let Some(first) = args.peek() {
        if let Some(deg) = first.strip_suffix("deg") {
            angle_deg = deg.trim().parse::<f32>().map_err(|_| err())?;
            args.next();
        } else if let Some(side) = first.strip_prefix("to ") {
            angle_deg = side_angle(side).ok_or_else(err)?;
            args.next();
        }
    }

    let mut raw_stops: Vec<(Rgba, Option<f32>)> = Vec::new();
    for arg in args {
        let (color_part, offset) = match arg.rsplit_once(' ') {
            Some((color, pct)) if pct.ends_with('%') => {
                let value = pct
                    .trim_end_matches('%')
                    .parse::<f32>()
                    .map_err(|_| err())?;
                (color.trim(), Some((value / 100.0).clamp(0.0, 1.0)))
            }
            _ => (arg, None),
        };
        let color = color_part.parse::<Rgba>().map_err(|_| err())?;
        raw_stops.push((color, offset));
    }

    if raw_stops.len() < 2 {
        return Err(err());
    }

    let last = (raw_stops.len() - 1) as f32;
    let stops = raw_stops
        .into_iter()
        .enumerate()
        .map(|(i, (color, offset))| GradientStop {
            offset: offset.unwrap_or(i as f32 / last),
            color,
        })
        .collect();

    Ok(Fill::LinearGradient { angle_deg, stops })
}

/// Split on commas that are not nested inside parentheses.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

impl FromStr for Background {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.is_empty() || lower == "none" {
            return Ok(Background::None);
        }
        if let Some(body) = lower
            .strip_prefix("linear-gradient(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_gradient(body, s).map(Background::Fill);
        }
        lower
            .parse::<Rgba>()
            .map(Background::solid)
            .map_err(|_| ParseColorError::new("background", s))
    }
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Background::None => f.write_str("none"),
            Background::Fill(Fill::Solid(color)) => write!(f, "{color}"),
            Background::Fill(Fill::LinearGradient { angle_deg, stops }) => {
                write!(f, "linear-gradient({angle_deg}deg")?;
                for stop in stops {
                    write!(f, ", {} {}%", stop.color, stop.offset * 100.0)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl TryFrom<String> for Background {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Background> for String {
    fn from(background: Background) -> Self {
        background.to_string()
    }
}
