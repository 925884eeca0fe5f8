use super::{Point, Size};

/// A rectangle in layout coordinates, relative to the parent's client origin.
///
/// Width and height are not required to be non-negative before an arrange
/// pass; arrange clamps them to zero. A NaN `left` or `top` is the
/// "keep current position" sentinel consumed by [`crate::Tree::arrange`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Rect {
    /// Construct a rectangle from its position and extents.
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A rectangle at the origin with the given size.
    pub fn from_size(size: Size) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    /// The rectangle's top-left corner.
    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// The rectangle's size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The right edge.
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// The bottom edge.
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Clamp negative extents to zero, leaving position untouched.
    pub fn clamp_size(&self) -> Self {
        Self {
            left: self.left,
            top: self.top,
            width: self.width.max(0.0),
            height: self.height.max(0.0),
        }
    }

    /// True if the point falls within the rectangle.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }
}
