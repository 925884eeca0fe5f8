//! Routed events: event kinds and the argument record that bubbles.

use std::any::Any;

/// Identifies one kind of routed event.
///
/// Built-in kinds occupy the low range; applications mint their own with
/// [`EventKind::user`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(u64);

/// First kind value available to applications.
const USER_BASE: u64 = 0x1000;

impl EventKind {
    /// The resolved data context of an element changed.
    pub const DATA_CONTEXT_CHANGED: EventKind = EventKind(1);
    /// A layout pass finished over an element.
    pub const LAYOUT_UPDATED: EventKind = EventKind(2);
    /// An element's scroll position changed.
    pub const SCROLL: EventKind = EventKind(3);

    /// An application-defined event kind.
    ///
    /// User kinds are offset past the built-in range, so `user(0)` never
    /// collides with [`DATA_CONTEXT_CHANGED`](Self::DATA_CONTEXT_CHANGED).
    pub const fn user(n: u64) -> EventKind {
        EventKind(USER_BASE + n)
    }
}

/// The argument record carried up the tree by a routed event.
pub struct RoutedEventArgs {
    /// What kind of event this is.
    pub kind: EventKind,
    /// Optional event-specific payload.
    pub param: Option<Box<dyn Any>>,
    /// Set by a handler to stop the event from bubbling further.
    pub handled: bool,
}

impl RoutedEventArgs {
    /// New unhandled event with no payload.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            param: None,
            handled: false,
        }
    }

    /// New unhandled event carrying `param`.
    pub fn with_param(kind: EventKind, param: impl Any) -> Self {
        Self {
            kind,
            param: Some(Box::new(param)),
            handled: false,
        }
    }

    /// Borrow the payload as a `T`, if present and of that type.
    pub fn param_as<T: 'static>(&self) -> Option<&T> {
        self.param.as_deref().and_then(|p| p.downcast_ref())
    }
}

/// A handler registered on a node for one event kind.
///
/// Handlers receive the tree, the node the event originated at, and the
/// mutable argument record. The node the handler is registered on is implied
/// by registration.
pub type RoutedHandler = Box<dyn FnMut(&mut crate::core::tree::Tree, crate::core::id::NodeId, &mut RoutedEventArgs)>;
