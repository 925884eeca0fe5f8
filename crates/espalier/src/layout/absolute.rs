//! The absolute strategy: children pinned at tagged coordinates.

use crate::geom::{Rect, Size};
use crate::layout::{Children, LayoutHost};

/// A child's position within an absolute container, packed into its layout
/// tag as a pair of `f32` coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsoluteTag {
    /// Distance from the container's left edge.
    pub left: f32,
    /// Distance from the container's top edge.
    pub top: f32,
}

impl AbsoluteTag {
    /// A position tag.
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    /// Pack into a layout tag.
    pub fn pack(self) -> u64 {
        u64::from(self.left.to_bits()) | u64::from(self.top.to_bits()) << 32
    }

    /// Unpack from a layout tag.
    pub fn unpack(tag: u64) -> Self {
        Self {
            left: f32::from_bits(tag as u32),
            top: f32::from_bits((tag >> 32) as u32),
        }
    }
}

/// Places each child at its tagged position, sized to content.
///
/// The container wants to be exactly big enough to cover every child's
/// offset plus extent.
#[derive(Debug, Default, Clone, Copy)]
pub struct AbsoluteLayout;

impl LayoutHost for AbsoluteLayout {
    fn measure(&mut self, children: &mut Children<'_>, _available: Size) -> Size {
        let mut desired = Size::zero();
        for i in 0..children.len() {
            let d = children.measure(i, Size::unbounded());
            let tag = AbsoluteTag::unpack(children.tag(i));
            desired.width = desired.width.max(f64::from(tag.left) + d.width);
            desired.height = desired.height.max(f64::from(tag.top) + d.height);
        }
        desired
    }

    fn arrange(&mut self, children: &mut Children<'_>, _final_size: Size) {
        for i in 0..children.len() {
            let d = children.desired(i);
            let tag = AbsoluteTag::unpack(children.tag(i));
            children.arrange(
                i,
                Rect::new(f64::from(tag.left), f64::from(tag.top), d.width, d.height),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::tree::Tree;
    use crate::geom::Size;

    use super::*;

    #[test]
    fn tag_round_trips() {
        let tag = AbsoluteTag::new(12.5, -3.0);
        assert_eq!(AbsoluteTag::unpack(tag.pack()), tag);
    }

    #[test]
    fn children_sit_at_their_tagged_positions() {
        let mut tree = Tree::new();
        let panel = tree.new_node();
        tree.set_layout_host(panel, Box::new(AbsoluteLayout)).unwrap();
        let a = tree.new_node();
        tree.set_size(a, Size::new(40.0, 20.0)).unwrap();
        tree.set_layout_tag(a, AbsoluteTag::new(10.0, 30.0).pack()).unwrap();
        tree.add_child(panel, a).unwrap();

        let d = tree.measure(panel, Size::unbounded()).unwrap();
        assert_eq!(d, Size::new(50.0, 50.0));

        tree.client_resized(panel, Size::new(200.0, 200.0)).unwrap();
        let rect = tree.arranged_rect(a).unwrap();
        assert_eq!((rect.left, rect.top, rect.width, rect.height), (10.0, 30.0, 40.0, 20.0));
    }
}
