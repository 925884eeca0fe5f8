//! Layout strategies and the two-pass measure/arrange protocol.
//!
//! A container delegates child sizing to a [`LayoutHost`]. The host never
//! sees nodes directly; it works through a [`Children`] view that measures
//! and places children by index, which keeps strategies free of tree
//! bookkeeping and makes them trivially swappable per container.

/// Absolute placement by per-child position tags.
mod absolute;
/// Edge-docking strips.
mod dock;
/// All children fill the container.
mod fill;
/// Typed row/column tracks with spans.
mod grid;
/// Sequential main-axis stacking.
mod stack;
/// Stacking with line breaks.
mod wrap;

/// Pass sequencing over a subtree.
pub(crate) mod pass;

pub use absolute::{AbsoluteLayout, AbsoluteTag};
pub use dock::{DockEdge, DockLayout};
pub use fill::FillLayout;
pub use grid::{GridLayout, GridLength, GridTag};
pub use stack::StackLayout;
pub use wrap::WrapLayout;

use crate::core::id::NodeId;
use crate::core::tree::Tree;
use crate::geom::{Rect, Size};

/// Main axis of a stack or wrap strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Children advance left to right.
    Horizontal,
    /// Children advance top to bottom.
    Vertical,
}

/// A container's child-sizing strategy.
///
/// `measure` sizes the children against the available content size and
/// returns the content size the container wants. `arrange` places the
/// children inside the final content size. Strategies may carry state
/// between the two phases; the tree guarantees `arrange` follows a
/// `measure` on the same instance.
pub trait LayoutHost {
    /// Measure the children and report the desired content size.
    fn measure(&mut self, children: &mut Children<'_>, available: Size) -> Size;

    /// Place the children within the final content size.
    fn arrange(&mut self, children: &mut Children<'_>, final_size: Size);
}

/// Indexed view of one container's children during a layout pass.
///
/// Holds the tree mutably for the duration of the pass; the container's
/// own element record has its host taken out, so recursion through
/// `measure` and `arrange` never re-enters the strategy that is running.
pub struct Children<'a> {
    /// The tree being laid out.
    tree: &'a mut Tree,
    /// The container's children, in insertion order.
    ids: Vec<NodeId>,
}

impl<'a> Children<'a> {
    /// View over `ids` within `tree`.
    pub(crate) fn new(tree: &'a mut Tree, ids: Vec<NodeId>) -> Self {
        Self { tree, ids }
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True if the container has no children.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Measure child `i` against `available` and return its desired size,
    /// margins included.
    pub fn measure(&mut self, i: usize, available: Size) -> Size {
        match self.ids.get(i) {
            Some(&id) => self.tree.measure_node(id, available),
            None => Size::zero(),
        }
    }

    /// The desired size cached by child `i`'s last measure, margins
    /// included.
    pub fn desired(&self, i: usize) -> Size {
        self.ids
            .get(i)
            .and_then(|&id| self.tree.desired_size(id).ok())
            .unwrap_or_else(Size::zero)
    }

    /// Arrange child `i` into the slot `rect`, in container-content
    /// coordinates.
    pub fn arrange(&mut self, i: usize, rect: Rect) {
        if let Some(&id) = self.ids.get(i) {
            self.tree.arrange_node(id, rect);
        }
    }

    /// The packed layout tag of child `i`.
    pub fn tag(&self, i: usize) -> u64 {
        self.ids
            .get(i)
            .and_then(|&id| self.tree.layout_tag(id).ok())
            .unwrap_or(0)
    }
}
