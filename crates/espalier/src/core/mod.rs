//! Core machinery: the tree arena, elements, delegates, properties,
//! dynamic objects, routed events and the binding engine.

/// Binding primitives: accessors, converters, modes, endpoints.
pub mod binding;
/// Multicast delegates.
pub mod delegate;
/// The element record.
pub mod element;
/// The error taxonomy.
pub mod error;
/// Routed event types.
pub mod event;
/// Arena key types.
pub mod id;
/// The dynamic-object layer.
pub mod object;
/// Property cells.
pub mod property;
/// The tree itself.
pub mod tree;
