//! Geometry primitives used across espalier.
//!
//! All types are plain `f64` value types with value equality. An infinite
//! [`Size`] component means "unconstrained" during measurement: the element
//! should size to its content on that axis.

/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;
/// Edge-thickness type used for margins.
mod thickness;

pub use point::Point;
pub use rect::Rect;
pub use size::Size;
pub use thickness::Thickness;
