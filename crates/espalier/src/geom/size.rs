use super::Thickness;

/// A width/height pair in layout coordinates.
///
/// Either component may be [`f64::INFINITY`] when used as an available size
/// during measurement, meaning the axis is unconstrained and the element
/// should size to its content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Size {
    /// Construct a size from its extents.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A zero size.
    pub fn zero() -> Self {
        Self::default()
    }

    /// A size unconstrained on both axes.
    pub fn unbounded() -> Self {
        Self {
            width: f64::INFINITY,
            height: f64::INFINITY,
        }
    }

    /// True if the width is unconstrained.
    pub fn width_unbounded(&self) -> bool {
        self.width.is_infinite()
    }

    /// True if the height is unconstrained.
    pub fn height_unbounded(&self) -> bool {
        self.height.is_infinite()
    }

    /// Shrink by an edge thickness, clamping at zero. Infinite axes stay
    /// infinite.
    pub fn deflate(&self, t: Thickness) -> Self {
        Self {
            width: (self.width - t.horizontal()).max(0.0),
            height: (self.height - t.vertical()).max(0.0),
        }
    }

    /// Grow by an edge thickness.
    pub fn inflate(&self, t: Thickness) -> Self {
        Self {
            width: self.width + t.horizontal(),
            height: self.height + t.vertical(),
        }
    }

    /// Component-wise maximum.
    pub fn max(&self, other: Self) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }
}

impl From<(f64, f64)> for Size {
    #[inline]
    fn from(v: (f64, f64)) -> Self {
        Self {
            width: v.0,
            height: v.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deflate_clamps_at_zero() {
        let s = Size::new(10.0, 5.0).deflate(Thickness::new(4.0, 8.0, 8.0, 8.0));
        assert_eq!(s, Size::new(0.0, 0.0));
    }

    #[test]
    fn deflate_keeps_infinity() {
        let s = Size::unbounded().deflate(Thickness::uniform(3.0));
        assert!(s.width_unbounded());
        assert!(s.height_unbounded());
    }

    #[test]
    fn inflate_round_trips_finite_sizes() {
        let t = Thickness::new(1.0, 2.0, 3.0, 4.0);
        let s = Size::new(10.0, 20.0).inflate(t).deflate(t);
        assert_eq!(s, Size::new(10.0, 20.0));
    }
}
