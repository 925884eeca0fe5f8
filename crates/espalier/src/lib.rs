//! A retained-mode element tree for desktop-style user interfaces.
//!
//! Espalier keeps a tree of elements in an arena, sizes it with a two-pass
//! measure/arrange protocol driven by pluggable layout strategies, and wires
//! application state to element properties through observable objects and a
//! binding engine. Events bubble from their origin toward the root; an
//! embedder receives final placements through the [`Backend`] seam.
//!
//! The crate is single-threaded by design: a [`Tree`] is `!Send`, and all
//! passes run synchronously on the thread that owns it.

/// Core machinery: tree, elements, delegates, bindings, events.
mod core;
/// Geometry primitives.
pub mod geom;
/// Layout strategies and the measure/arrange protocol.
pub mod layout;
/// Test helpers, available to dependents via the `testing` feature.
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use crate::core::binding::{
    Accessor, BindingMode, Converter, Endpoint, NodeProperty, SourceSpec,
};
pub use crate::core::delegate::{CallableId, Delegate};
pub use crate::core::element::{HorizontalAlign, ScrollState, VerticalAlign};
pub use crate::core::error::{Error, Result};
pub use crate::core::event::{EventKind, RoutedEventArgs, RoutedHandler};
pub use crate::core::id::{BindingId, NodeId};
pub use crate::core::object::{
    Boxed, DynamicObject, Notifier, OBSERVED_VALUE, Observable, PropertyChangedArgs, PropertyId,
    dynamic_cast, is_type,
};
pub use crate::core::property::Property;
pub use crate::core::tree::{Backend, Tree};
