/// The thickness of a frame around a rectangle, used for margins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Thickness {
    /// Left edge thickness.
    pub left: f64,
    /// Top edge thickness.
    pub top: f64,
    /// Right edge thickness.
    pub right: f64,
    /// Bottom edge thickness.
    pub bottom: f64,
}

impl Thickness {
    /// Construct a thickness from all four edges.
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// A thickness with the same value on all four edges.
    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    /// A thickness from a horizontal and a vertical value.
    pub fn symmetric(horizontal: f64, vertical: f64) -> Self {
        Self::new(horizontal, vertical, horizontal, vertical)
    }

    /// Combined left and right thickness.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Combined top and bottom thickness.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(Thickness::uniform(2.0), Thickness::new(2.0, 2.0, 2.0, 2.0));
        assert_eq!(
            Thickness::symmetric(1.0, 3.0),
            Thickness::new(1.0, 3.0, 1.0, 3.0)
        );
    }

    #[test]
    fn sums() {
        let t = Thickness::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(t.horizontal(), 4.0);
        assert_eq!(t.vertical(), 6.0);
    }
}
