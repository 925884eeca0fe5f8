//! The fill strategy: every child gets the whole container.

use crate::geom::{Rect, Size};
use crate::layout::{Children, LayoutHost};

/// Arranges all children on top of each other, each filling the container.
///
/// Desired size is the per-axis maximum over the children, so the container
/// is exactly big enough for its largest child.
#[derive(Debug, Default, Clone, Copy)]
pub struct FillLayout;

impl LayoutHost for FillLayout {
    fn measure(&mut self, children: &mut Children<'_>, available: Size) -> Size {
        let mut desired = Size::zero();
        for i in 0..children.len() {
            desired = desired.max(children.measure(i, available));
        }
        desired
    }

    fn arrange(&mut self, children: &mut Children<'_>, final_size: Size) {
        let slot = Rect::from_size(final_size);
        for i in 0..children.len() {
            children.arrange(i, slot);
        }
    }
}
