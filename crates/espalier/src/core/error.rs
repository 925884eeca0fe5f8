use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::NodeId;

/// Result type for espalier operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
///
/// Binding update failures are deliberately not part of this taxonomy:
/// [`crate::Tree::update_target`] and [`crate::Tree::update_source`] swallow
/// accessor and converter failures and report a boolean instead, so one bad
/// binding cannot abort a batch of updates.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// Write attempted on a read-only property cell.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// A delegate with zero registered callables was invoked.
    #[error("empty delegate invoked")]
    EmptyDelegate,

    /// A checked dynamic downcast failed.
    #[error("invalid cast to {0}")]
    InvalidCast(String),

    /// Binding construction between incompatible value types with no
    /// bridging converter.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The node is not present in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Invalid input error.
    #[error("invalid: {0}")]
    Invalid(String),
}
