//! Helpers for exercising trees in tests: quick node constructors and a
//! backend that records every placement.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::error::Result;
use crate::core::id::NodeId;
use crate::core::tree::{Backend, Tree};
use crate::geom::{Rect, Size};
use crate::layout::LayoutHost;

/// A fixed-size leaf attached to `parent`.
pub fn leaf(tree: &mut Tree, parent: NodeId, size: Size) -> Result<NodeId> {
    let id = tree.new_node();
    tree.set_size(id, size)?;
    tree.add_child(parent, id)?;
    Ok(id)
}

/// A detached container driven by `host`.
pub fn panel(tree: &mut Tree, host: Box<dyn LayoutHost>) -> Result<NodeId> {
    let id = tree.new_node();
    tree.set_layout_host(id, host)?;
    Ok(id)
}

/// What a [`RecordingBackend`] saw.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    /// A node was placed.
    Place(u64, Rect),
    /// A node was removed.
    Removed(u64),
}

/// Backend that appends every call to a shared log.
#[derive(Default)]
pub struct RecordingBackend {
    /// The shared call log.
    calls: Rc<RefCell<Vec<BackendCall>>>,
}

impl RecordingBackend {
    /// A recorder plus the log handle to inspect after moving the recorder
    /// into the tree.
    pub fn new() -> (Self, Rc<RefCell<Vec<BackendCall>>>) {
        let backend = Self::default();
        let calls = Rc::clone(&backend.calls);
        (backend, calls)
    }
}

impl Backend for RecordingBackend {
    fn place(&mut self, uid: u64, rect: Rect) {
        self.calls.borrow_mut().push(BackendCall::Place(uid, rect));
    }

    fn removed(&mut self, uid: u64) {
        self.calls.borrow_mut().push(BackendCall::Removed(uid));
    }
}
