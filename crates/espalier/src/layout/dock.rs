//! The dock strategy: edge-anchored strips around a filled center.

use crate::geom::{Rect, Size};
use crate::layout::{Children, LayoutHost};

/// Which container edge a docked child is anchored to.
///
/// Stored in the child's layout tag; anything unrecognized reads as `Left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DockEdge {
    /// Anchor to the left edge.
    #[default]
    Left,
    /// Anchor to the top edge.
    Top,
    /// Anchor to the right edge.
    Right,
    /// Anchor to the bottom edge.
    Bottom,
}

impl DockEdge {
    /// Pack into a layout tag.
    pub fn pack(self) -> u64 {
        match self {
            Self::Left => 0,
            Self::Top => 1,
            Self::Right => 2,
            Self::Bottom => 3,
        }
    }

    /// Unpack from a layout tag; unknown values dock left.
    pub fn from_tag(tag: u64) -> Self {
        match tag {
            1 => Self::Top,
            2 => Self::Right,
            3 => Self::Bottom,
            _ => Self::Left,
        }
    }
}

/// Peels edge strips off the container in child order.
///
/// Each child takes a strip of its desired extent from its tagged edge; by
/// default the final child fills whatever is left, tag ignored.
#[derive(Debug, Clone, Copy)]
pub struct DockLayout {
    /// Give the final child the remaining rect regardless of its tag.
    last_child_fill: bool,
}

impl Default for DockLayout {
    fn default() -> Self {
        Self {
            last_child_fill: true,
        }
    }
}

impl DockLayout {
    /// Docking with the final child filling the remainder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose whether the final child fills the remainder.
    pub fn with_last_child_fill(fill: bool) -> Self {
        Self {
            last_child_fill: fill,
        }
    }
}

impl LayoutHost for DockLayout {
    fn measure(&mut self, children: &mut Children<'_>, available: Size) -> Size {
        let mut rest = available;
        for i in 0..children.len() {
            let avail = Size::new(rest.width.max(0.0), rest.height.max(0.0));
            let d = children.measure(i, avail);
            match DockEdge::from_tag(children.tag(i)) {
                DockEdge::Left | DockEdge::Right => rest.width -= d.width,
                DockEdge::Top | DockEdge::Bottom => rest.height -= d.height,
            }
        }
        // Accumulate in reverse so each strip wraps everything docked after
        // it.
        let mut desired = Size::zero();
        for i in (0..children.len()).rev() {
            let d = children.desired(i);
            match DockEdge::from_tag(children.tag(i)) {
                DockEdge::Left | DockEdge::Right => {
                    desired.width += d.width;
                    desired.height = desired.height.max(d.height);
                }
                DockEdge::Top | DockEdge::Bottom => {
                    desired.height += d.height;
                    desired.width = desired.width.max(d.width);
                }
            }
        }
        desired
    }

    fn arrange(&mut self, children: &mut Children<'_>, final_size: Size) {
        let mut rest = Rect::from_size(final_size);
        let n = children.len();
        for i in 0..n {
            if self.last_child_fill && i == n - 1 {
                children.arrange(i, rest);
                break;
            }
            let d = children.desired(i);
            let slot = match DockEdge::from_tag(children.tag(i)) {
                DockEdge::Left => {
                    let w = d.width.min(rest.width);
                    let slot = Rect::new(rest.left, rest.top, w, rest.height);
                    rest.left += w;
                    rest.width -= w;
                    slot
                }
                DockEdge::Top => {
                    let h = d.height.min(rest.height);
                    let slot = Rect::new(rest.left, rest.top, rest.width, h);
                    rest.top += h;
                    rest.height -= h;
                    slot
                }
                DockEdge::Right => {
                    let w = d.width.min(rest.width);
                    let slot = Rect::new(rest.left + rest.width - w, rest.top, w, rest.height);
                    rest.width -= w;
                    slot
                }
                DockEdge::Bottom => {
                    let h = d.height.min(rest.height);
                    let slot = Rect::new(rest.left, rest.top + rest.height - h, rest.width, h);
                    rest.height -= h;
                    slot
                }
            };
            children.arrange(i, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::id::NodeId;
    use crate::core::tree::Tree;
    use crate::geom::Size;

    use super::*;

    /// Dock panel plus one child per (edge, width, height) entry.
    fn docked(spec: &[(DockEdge, f64, f64)], fill: bool) -> (Tree, NodeId, Vec<NodeId>) {
        let mut tree = Tree::new();
        let panel = tree.new_node();
        tree.set_layout_host(panel, Box::new(DockLayout::with_last_child_fill(fill)))
            .unwrap();
        let mut kids = Vec::new();
        for &(edge, w, h) in spec {
            let c = tree.new_node();
            tree.set_size(c, Size::new(w, h)).unwrap();
            tree.set_layout_tag(c, edge.pack()).unwrap();
            tree.add_child(panel, c).unwrap();
            kids.push(c);
        }
        (tree, panel, kids)
    }

    #[test]
    fn strips_peel_in_child_order() {
        let (mut tree, panel, kids) = docked(
            &[
                (DockEdge::Top, 0.0, 20.0),
                (DockEdge::Left, 30.0, 0.0),
                (DockEdge::Left, 0.0, 0.0),
            ],
            true,
        );
        tree.client_resized(panel, Size::new(200.0, 200.0)).unwrap();

        let a = tree.arranged_rect(kids[0]).unwrap();
        assert_eq!((a.left, a.top, a.width, a.height), (0.0, 0.0, 200.0, 20.0));
        let b = tree.arranged_rect(kids[1]).unwrap();
        assert_eq!((b.left, b.top, b.width, b.height), (0.0, 20.0, 30.0, 180.0));
        let c = tree.arranged_rect(kids[2]).unwrap();
        assert_eq!((c.left, c.top, c.width, c.height), (30.0, 20.0, 170.0, 180.0));
    }

    #[test]
    fn last_child_fill_ignores_the_tag() {
        let (mut tree, panel, kids) = docked(
            &[(DockEdge::Left, 50.0, 0.0), (DockEdge::Bottom, 10.0, 10.0)],
            true,
        );
        tree.client_resized(panel, Size::new(100.0, 100.0)).unwrap();
        let last = tree.arranged_rect(kids[1]).unwrap();
        assert_eq!(
            (last.left, last.top, last.width, last.height),
            (50.0, 0.0, 50.0, 100.0)
        );
    }

    #[test]
    fn without_fill_every_child_docks() {
        let (mut tree, panel, kids) = docked(
            &[(DockEdge::Right, 40.0, 0.0), (DockEdge::Bottom, 0.0, 30.0)],
            false,
        );
        tree.client_resized(panel, Size::new(100.0, 100.0)).unwrap();
        let right = tree.arranged_rect(kids[0]).unwrap();
        assert_eq!((right.left, right.width), (60.0, 40.0));
        let bottom = tree.arranged_rect(kids[1]).unwrap();
        assert_eq!((bottom.top, bottom.height, bottom.width), (70.0, 30.0, 60.0));
    }

    #[test]
    fn unknown_tags_dock_left() {
        assert_eq!(DockEdge::from_tag(99), DockEdge::Left);
        let (mut tree, panel, kids) =
            docked(&[(DockEdge::Left, 25.0, 0.0), (DockEdge::Left, 0.0, 0.0)], true);
        tree.set_layout_tag(kids[0], 77).unwrap();
        tree.client_resized(panel, Size::new(100.0, 100.0)).unwrap();
        let a = tree.arranged_rect(kids[0]).unwrap();
        assert_eq!((a.left, a.width), (0.0, 25.0));
    }

    #[test]
    fn desired_wraps_all_strips() {
        let (mut tree, panel, _) = docked(
            &[
                (DockEdge::Top, 0.0, 20.0),
                (DockEdge::Left, 30.0, 50.0),
                (DockEdge::Left, 40.0, 0.0),
            ],
            true,
        );
        let d = tree.measure(panel, Size::new(200.0, 200.0)).unwrap();
        assert_eq!(d, Size::new(70.0, 70.0));
    }
}
