//! Points, sizes, and rectangles in surface pixel coordinates.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of an on-screen or raster area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether either side is zero, negative, or not a number.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanned by two corner points in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the rectangle covers no area.
    pub fn is_degenerate(&self) -> bool {
        self.size().is_degenerate()
    }

    /// Scale position and size independently per axis.
    pub fn scale(&self, sx: f64, sy: f64) -> Rect {
        Rect {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }

    /// Overlap with another rectangle, or `None` when they do not overlap.
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        let rect = Rect::new(x, y, right - x, bottom - y);
        (!rect.is_degenerate()).then_some(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_normalizes() {
        let r = Rect::from_corners(Point::new(50.0, 10.0), Point::new(20.0, 40.0));
        assert_eq!(r, Rect::new(20.0, 10.0, 30.0, 30.0));
    }

    #[test]
    fn test_degenerate() {
        assert!(Rect::new(0.0, 0.0, 0.0, 0.0).is_degenerate());
        assert!(Rect::new(5.0, 5.0, -1.0, 10.0).is_degenerate());
        assert!(Rect::new(5.0, 5.0, 10.0, f64::NAN).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }

    #[test]
    fn test_scale_per_axis() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0).scale(2.0, 0.5);
        assert_eq!(r, Rect::new(20.0, 10.0, 60.0, 20.0));
    }

    #[test]
    fn test_intersect() {
        let a = Rect::new(0.0, 0.0, 100.0, 100.0);
        let b = Rect::new(80.0, 90.0, 50.0, 50.0);
        assert_eq!(a.intersect(&b), Some(Rect::new(80.0, 90.0, 20.0, 10.0)));
        assert_eq!(a.intersect(&Rect::new(200.0, 0.0, 5.0, 5.0)), None);
    }
}
