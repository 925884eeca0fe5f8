//! The per-node element record stored in the tree arena.

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::event::{EventKind, RoutedHandler};
use crate::core::id::NodeId;
use crate::core::object::DynamicObject;
use crate::geom::{Point, Rect, Size, Thickness};
use crate::layout::LayoutHost;

/// Horizontal placement of an element inside the slot its parent assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    /// Flush left.
    Start,
    /// Centered.
    Center,
    /// Flush right.
    End,
    /// Fill the slot width.
    #[default]
    Stretch,
}

/// Vertical placement of an element inside the slot its parent assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlign {
    /// Flush top.
    Start,
    /// Centered.
    Center,
    /// Flush bottom.
    End,
    /// Fill the slot height.
    #[default]
    Stretch,
}

/// Per-axis scroll bookkeeping for a container.
///
/// A limit of zero means the axis is disabled; the arrange offset applied to
/// non-float children is always the negated position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Horizontal scroll position, in `[0, h_limit]`.
    pub h_pos: f64,
    /// Horizontal scrollable range; zero disables the axis.
    pub h_limit: f64,
    /// Vertical scroll position, in `[0, v_limit]`.
    pub v_pos: f64,
    /// Vertical scrollable range; zero disables the axis.
    pub v_limit: f64,
}

impl ScrollState {
    /// True if the horizontal axis can scroll.
    pub fn h_enabled(&self) -> bool {
        self.h_limit > 0.0
    }

    /// True if the vertical axis can scroll.
    pub fn v_enabled(&self) -> bool {
        self.v_limit > 0.0
    }

    /// The arrange offset applied to non-float children.
    pub fn offset(&self) -> Point {
        Point::new(-self.h_pos, -self.v_pos)
    }
}

/// One node of the element tree.
///
/// Owned by the arena; identity lives in the [`NodeId`] key, not here.
pub(crate) struct Element {
    /// Stable diagnostic id, also the backend placement key.
    pub(crate) uid: u64,
    /// Parent link; `None` for roots.
    pub(crate) parent: Option<NodeId>,
    /// Children in insertion order.
    pub(crate) children: Vec<NodeId>,
    /// Outer margin consumed by measurement and arrangement.
    pub(crate) margin: Thickness,
    /// Horizontal alignment within the parent-assigned slot.
    pub(crate) h_align: HorizontalAlign,
    /// Vertical alignment within the parent-assigned slot.
    pub(crate) v_align: VerticalAlign,
    /// Explicit width; together with the margin this is the measured size.
    pub(crate) width: f64,
    /// Explicit height; together with the margin this is the measured size.
    pub(crate) height: f64,
    /// Desired size cached by the last measure pass, margins included.
    pub(crate) desired: Size,
    /// Rect assigned by the last arrange pass, in parent coordinates.
    pub(crate) rect: Rect,
    /// Packed 64-bit tag consumed by the parent's layout strategy.
    pub(crate) layout_tag: u64,
    /// Float elements ignore the parent's scroll offset and extent.
    pub(crate) float: bool,
    /// Layout strategy arranging this node's children, if any.
    pub(crate) host: Option<Box<dyn LayoutHost>>,
    /// Auto-size containers take their desired size from their strategy.
    pub(crate) auto_size: bool,
    /// Scroll bookkeeping; only meaningful on containers.
    pub(crate) scroll: ScrollState,
    /// Locally set data context, if any.
    pub(crate) data_context: Option<Rc<dyn DynamicObject>>,
    /// Routed handlers, one slot per event kind.
    pub(crate) handlers: HashMap<EventKind, RoutedHandler>,
}

impl Element {
    /// Fresh element with no parent, no children and all-default layout
    /// state.
    pub(crate) fn new(uid: u64) -> Self {
        Self {
            uid,
            parent: None,
            children: Vec::new(),
            margin: Thickness::default(),
            h_align: HorizontalAlign::default(),
            v_align: VerticalAlign::default(),
            width: 0.0,
            height: 0.0,
            desired: Size::zero(),
            rect: Rect::default(),
            layout_tag: 0,
            float: false,
            host: None,
            auto_size: true,
            scroll: ScrollState::default(),
            data_context: None,
            handlers: HashMap::new(),
        }
    }

    /// The rect children see: the arranged rect at local origin.
    pub(crate) fn client_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.rect.width, self.rect.height)
    }
}
