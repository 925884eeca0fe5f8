//! The wrap strategy: stacking with line breaks.

use crate::geom::{Rect, Size};
use crate::layout::{Children, LayoutHost, Orientation};

/// Stacks children along one axis and breaks to a new line when the next
/// child would overflow the available extent.
///
/// With an unconstrained main axis there is nothing to break against, so
/// the strategy degenerates to a plain stack.
#[derive(Debug, Clone, Copy)]
pub struct WrapLayout {
    /// Which axis children advance along before breaking.
    orientation: Orientation,
}

impl WrapLayout {
    /// Wrap left to right, breaking downward.
    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
        }
    }

    /// Wrap top to bottom, breaking rightward.
    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
        }
    }

    /// The wrapping axis.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Main-axis component of a size.
    fn main(&self, s: Size) -> f64 {
        match self.orientation {
            Orientation::Horizontal => s.width,
            Orientation::Vertical => s.height,
        }
    }

    /// Cross-axis component of a size.
    fn cross(&self, s: Size) -> f64 {
        match self.orientation {
            Orientation::Horizontal => s.height,
            Orientation::Vertical => s.width,
        }
    }

    /// Recompose a size from main and cross components.
    fn compose(&self, main: f64, cross: f64) -> Size {
        match self.orientation {
            Orientation::Horizontal => Size::new(main, cross),
            Orientation::Vertical => Size::new(cross, main),
        }
    }
}

impl LayoutHost for WrapLayout {
    fn measure(&mut self, children: &mut Children<'_>, available: Size) -> Size {
        let limit = self.main(available);
        if !limit.is_finite() {
            // No break limit: behave like a stack.
            let mut sum = 0.0_f64;
            let mut max = 0.0_f64;
            for i in 0..children.len() {
                let d = children.measure(i, self.compose(f64::INFINITY, self.cross(available)));
                sum += self.main(d);
                max = max.max(self.cross(d));
            }
            return self.compose(sum, max);
        }

        let mut line_start = 0.0_f64;
        let mut line_main = 0.0_f64;
        let mut line_cross = 0.0_f64;
        let mut max_main = 0.0_f64;
        for i in 0..children.len() {
            let d = children.measure(i, self.compose(limit - line_main, f64::INFINITY));
            if line_main + self.main(d) > limit {
                line_start += line_cross;
                line_main = 0.0;
                line_cross = 0.0;
            }
            line_main += self.main(d);
            line_cross = line_cross.max(self.cross(d));
            max_main = max_main.max(line_main);
        }
        self.compose(max_main, line_start + line_cross)
    }

    fn arrange(&mut self, children: &mut Children<'_>, final_size: Size) {
        let limit = self.main(final_size);
        let mut line_start = 0.0_f64;
        let mut line_main = 0.0_f64;
        let mut line_cross = 0.0_f64;
        for i in 0..children.len() {
            let d = children.desired(i);
            if line_main + self.main(d) > limit && line_main > 0.0 {
                line_start += line_cross;
                line_main = 0.0;
                line_cross = 0.0;
            }
            let slot = match self.orientation {
                Orientation::Horizontal => Rect::new(line_main, line_start, d.width, d.height),
                Orientation::Vertical => Rect::new(line_start, line_main, d.width, d.height),
            };
            children.arrange(i, slot);
            line_main += self.main(d);
            line_cross = line_cross.max(self.cross(d));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::id::NodeId;
    use crate::core::tree::Tree;
    use crate::geom::Size;

    use super::*;

    /// Wrap panel with fixed-size children.
    fn wrapped(sizes: &[(f64, f64)]) -> (Tree, NodeId, Vec<NodeId>) {
        let mut tree = Tree::new();
        let panel = tree.new_node();
        tree.set_layout_host(panel, Box::new(WrapLayout::horizontal()))
            .unwrap();
        let mut kids = Vec::new();
        for &(w, h) in sizes {
            let c = tree.new_node();
            tree.set_size(c, Size::new(w, h)).unwrap();
            tree.add_child(panel, c).unwrap();
            kids.push(c);
        }
        (tree, panel, kids)
    }

    #[test]
    fn unconstrained_behaves_like_a_stack() {
        let (mut tree, panel, _) = wrapped(&[(40.0, 10.0), (40.0, 20.0), (40.0, 15.0)]);
        let d = tree.measure(panel, Size::unbounded()).unwrap();
        assert_eq!(d, Size::new(120.0, 20.0));
    }

    #[test]
    fn breaks_when_the_line_overflows() {
        // Two 40-wide children fit in 100; the third wraps.
        let (mut tree, panel, _) = wrapped(&[(40.0, 10.0), (40.0, 20.0), (40.0, 15.0)]);
        let d = tree.measure(panel, Size::new(100.0, f64::INFINITY)).unwrap();
        assert_eq!(d, Size::new(80.0, 35.0));
    }

    #[test]
    fn arrange_places_lines_below_each_other() {
        let (mut tree, panel, kids) = wrapped(&[(40.0, 10.0), (40.0, 20.0), (40.0, 15.0)]);
        tree.set_auto_size(panel, false).unwrap();
        tree.client_resized(panel, Size::new(100.0, 100.0)).unwrap();

        assert_eq!(tree.arranged_rect(kids[0]).unwrap().top_left().x, 0.0);
        assert_eq!(tree.arranged_rect(kids[1]).unwrap().left, 40.0);
        let third = tree.arranged_rect(kids[2]).unwrap();
        assert_eq!(third.left, 0.0);
        // The second line starts below the first line's tallest child.
        assert_eq!(third.top, 20.0);
    }

    #[test]
    fn vertical_wrap_breaks_rightward() {
        let mut tree = Tree::new();
        let panel = tree.new_node();
        tree.set_layout_host(panel, Box::new(WrapLayout::vertical()))
            .unwrap();
        for _ in 0..3 {
            let c = tree.new_node();
            tree.set_size(c, Size::new(30.0, 40.0)).unwrap();
            tree.add_child(panel, c).unwrap();
        }
        let d = tree.measure(panel, Size::new(f64::INFINITY, 100.0)).unwrap();
        // Two fit per column; the third starts a second column.
        assert_eq!(d, Size::new(60.0, 80.0));
    }
}
