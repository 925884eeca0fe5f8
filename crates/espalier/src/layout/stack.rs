//! The stack strategy: children in a row or column.

use crate::geom::{Rect, Size};
use crate::layout::{Children, LayoutHost, Orientation};

/// Stacks children along one axis at their desired sizes.
///
/// The main axis is measured unconstrained, so a stack never squeezes its
/// children; the cross axis passes the available extent through. Desired
/// size is the main-axis sum by the cross-axis maximum.
#[derive(Debug, Clone, Copy)]
pub struct StackLayout {
    /// Which axis children advance along.
    orientation: Orientation,
}

impl StackLayout {
    /// A horizontal stack.
    pub fn horizontal() -> Self {
        Self {
            orientation: Orientation::Horizontal,
        }
    }

    /// A vertical stack.
    pub fn vertical() -> Self {
        Self {
            orientation: Orientation::Vertical,
        }
    }

    /// The stacking axis.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }
}

impl LayoutHost for StackLayout {
    fn measure(&mut self, children: &mut Children<'_>, available: Size) -> Size {
        let mut sum = 0.0_f64;
        let mut max = 0.0_f64;
        for i in 0..children.len() {
            let child_avail = match self.orientation {
                Orientation::Horizontal => Size::new(f64::INFINITY, available.height),
                Orientation::Vertical => Size::new(available.width, f64::INFINITY),
            };
            let d = children.measure(i, child_avail);
            match self.orientation {
                Orientation::Horizontal => {
                    sum += d.width;
                    max = max.max(d.height);
                }
                Orientation::Vertical => {
                    sum += d.height;
                    max = max.max(d.width);
                }
            }
        }
        match self.orientation {
            Orientation::Horizontal => Size::new(sum, max),
            Orientation::Vertical => Size::new(max, sum),
        }
    }

    fn arrange(&mut self, children: &mut Children<'_>, final_size: Size) {
        let mut offset = 0.0_f64;
        for i in 0..children.len() {
            let d = children.desired(i);
            let slot = match self.orientation {
                Orientation::Horizontal => Rect::new(offset, 0.0, d.width, final_size.height),
                Orientation::Vertical => Rect::new(0.0, offset, final_size.width, d.height),
            };
            children.arrange(i, slot);
            offset += match self.orientation {
                Orientation::Horizontal => d.width,
                Orientation::Vertical => d.height,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::tree::Tree;
    use crate::geom::{Size, Thickness};

    use super::*;

    /// Panel with a horizontal stack and three fixed-width children.
    fn stacked(widths: &[f64]) -> (Tree, crate::core::id::NodeId, Vec<crate::core::id::NodeId>) {
        let mut tree = Tree::new();
        let panel = tree.new_node();
        tree.set_layout_host(panel, Box::new(StackLayout::horizontal()))
            .unwrap();
        let mut kids = Vec::new();
        for &w in widths {
            let c = tree.new_node();
            tree.set_size(c, Size::new(w, 10.0)).unwrap();
            tree.add_child(panel, c).unwrap();
            kids.push(c);
        }
        (tree, panel, kids)
    }

    #[test]
    fn desired_is_sum_by_max() {
        let (mut tree, panel, _) = stacked(&[20.0, 30.0, 50.0]);
        let d = tree.measure(panel, Size::new(40.0, 40.0)).unwrap();
        assert_eq!(d, Size::new(100.0, 10.0));
    }

    #[test]
    fn margins_count_toward_the_sum() {
        let (mut tree, panel, kids) = stacked(&[20.0, 30.0]);
        tree.set_margin(kids[0], Thickness::uniform(5.0)).unwrap();
        let d = tree.measure(panel, Size::unbounded()).unwrap();
        assert_eq!(d.width, 30.0 + 30.0);
        assert_eq!(d.height, 20.0);
    }

    #[test]
    fn children_land_at_cumulative_offsets() {
        let (mut tree, panel, kids) = stacked(&[20.0, 30.0, 50.0]);
        tree.client_resized(panel, Size::new(200.0, 40.0)).unwrap();

        let lefts: Vec<f64> = kids
            .iter()
            .map(|&k| tree.arranged_rect(k).unwrap().left)
            .collect();
        assert_eq!(lefts, vec![0.0, 20.0, 50.0]);
        // Cross axis stretches to the final size.
        assert_eq!(tree.arranged_rect(kids[0]).unwrap().height, 40.0);
    }

    #[test]
    fn vertical_stack_advances_down() {
        let mut tree = Tree::new();
        let panel = tree.new_node();
        tree.set_layout_host(panel, Box::new(StackLayout::vertical()))
            .unwrap();
        let a = tree.new_node();
        tree.set_size(a, Size::new(10.0, 25.0)).unwrap();
        let b = tree.new_node();
        tree.set_size(b, Size::new(10.0, 35.0)).unwrap();
        tree.add_child(panel, a).unwrap();
        tree.add_child(panel, b).unwrap();

        let d = tree.measure(panel, Size::unbounded()).unwrap();
        assert_eq!(d, Size::new(10.0, 60.0));

        tree.client_resized(panel, Size::new(100.0, 100.0)).unwrap();
        assert_eq!(tree.arranged_rect(b).unwrap().top, 25.0);
    }
}
